//! Request options for the OSRM v5 HTTP services and their query encoding.
//!
//! Booleans are sent as `true`/`false`, index lists joined with `;`,
//! keyword lists joined with `,`, and keywords in lower case. Options left
//! unset are omitted from the query string.

use std::fmt;

/// Ordered query parameters of a single request.
///
/// # Examples
///
/// ```
/// use delivery_routes::osrm::Params;
///
/// let p = Params::new()
///     .flag("steps", false)
///     .indices("sources", &[0, 1, 2])
///     .words("annotations", &["duration", "distance"]);
/// assert_eq!(p.get("steps"), Some("false"));
/// assert_eq!(p.get("sources"), Some("0;1;2"));
/// assert_eq!(p.get("annotations"), Some("duration,distance"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(Vec<(&'static str, String)>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flag(mut self, key: &'static str, value: bool) -> Self {
        self.0.push((key, value.to_string()));
        self
    }

    pub fn word(mut self, key: &'static str, value: impl fmt::Display) -> Self {
        self.0.push((key, value.to_string().to_lowercase()));
        self
    }

    pub fn number(mut self, key: &'static str, value: f64) -> Self {
        self.0.push((key, value.to_string()));
        self
    }

    pub fn indices(mut self, key: &'static str, values: &[usize]) -> Self {
        self.0.push((key, join(values, ";")));
        self
    }

    pub fn numbers(mut self, key: &'static str, values: &[f64]) -> Self {
        self.0.push((key, join(values, ";")));
        self
    }

    pub fn integers(mut self, key: &'static str, values: &[u64]) -> Self {
        self.0.push((key, join(values, ";")));
        self
    }

    pub fn words<S: AsRef<str>>(mut self, key: &'static str, values: &[S]) -> Self {
        let joined: Vec<String> = values.iter().map(|v| v.as_ref().to_lowercase()).collect();
        self.0.push((key, joined.join(",")));
        self
    }

    /// Applies `f` only when `value` is set.
    pub fn maybe<T>(self, value: Option<T>, f: impl FnOnce(Self, T) -> Self) -> Self {
        match value {
            Some(v) => f(self, v),
            None => self,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn join<T: ToString>(values: &[T], sep: &str) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(sep)
}

macro_rules! keyword_enum {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident => $word:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $word),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

keyword_enum!(
    /// Format of returned route geometry.
    Geometries {
        Polyline => "polyline",
        Polyline6 => "polyline6",
        GeoJson => "geojson",
    }
);

keyword_enum!(
    /// Detail of the overview geometry.
    Overview {
        Simplified => "simplified",
        Full => "full",
        False => "false",
    }
);

keyword_enum!(
    /// Whether to force going straight at waypoints.
    ContinueStraight {
        Default => "default",
        True => "true",
        False => "false",
    }
);

keyword_enum!(
    /// Per-segment metadata fields.
    Annotation {
        Nodes => "nodes",
        Distance => "distance",
        Duration => "duration",
        Datasources => "datasources",
        Weight => "weight",
        Speed => "speed",
    }
);

keyword_enum!(
    /// Handling of large timestamp gaps in map matching.
    Gaps {
        Split => "split",
        Ignore => "ignore",
    }
);

keyword_enum!(
    /// Coordinate used for `fallback_speed` estimates.
    FallbackCoordinate {
        Input => "input",
        Snapped => "snapped",
    }
);

keyword_enum!(
    /// Where a trip may start.
    TripSource {
        Any => "any",
        First => "first",
    }
);

keyword_enum!(
    /// Where a trip may end.
    TripDestination {
        Any => "any",
        Last => "last",
    }
);

/// Per-coordinate annotations: off, all, or a subset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Annotations {
    #[default]
    False,
    True,
    Only(Vec<Annotation>),
}

impl Annotations {
    fn apply(&self, params: Params) -> Params {
        match self {
            Self::False => params.flag("annotations", false),
            Self::True => params.flag("annotations", true),
            Self::Only(fields) => {
                let words: Vec<&str> = fields.iter().map(|a| a.as_str()).collect();
                params.words("annotations", &words)
            }
        }
    }
}

/// Alternative-route search: off, on, or up to a number of routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alternatives {
    #[default]
    False,
    True,
    Count(u32),
}

/// `all` or an explicit list of coordinate indices.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Indices {
    #[default]
    All,
    List(Vec<usize>),
}

impl Indices {
    fn apply(&self, key: &'static str, params: Params) -> Params {
        match self {
            Self::All => params.word(key, "all"),
            Self::List(list) => params.indices(key, list),
        }
    }
}

/// Table service annotation: which matrices to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableAnnotation {
    Duration,
    Distance,
}

impl TableAnnotation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Duration => "duration",
            Self::Distance => "distance",
        }
    }
}

/// Options of the `route` service.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteOptions {
    pub alternatives: Alternatives,
    pub steps: bool,
    pub annotations: Annotations,
    pub geometries: Geometries,
    pub overview: Overview,
    pub continue_straight: ContinueStraight,
    pub waypoints: Option<Vec<usize>>,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            alternatives: Alternatives::False,
            steps: false,
            annotations: Annotations::False,
            geometries: Geometries::Polyline,
            overview: Overview::Simplified,
            continue_straight: ContinueStraight::Default,
            waypoints: None,
        }
    }
}

impl RouteOptions {
    pub fn params(&self) -> Params {
        let p = match self.alternatives {
            Alternatives::False => Params::new().flag("alternatives", false),
            Alternatives::True => Params::new().flag("alternatives", true),
            Alternatives::Count(n) => Params::new().word("alternatives", n),
        };
        let p = self.annotations.apply(p.flag("steps", self.steps));
        p.word("geometries", self.geometries)
            .word("overview", self.overview)
            .word("continue_straight", self.continue_straight)
            .maybe(self.waypoints.as_deref(), |p, w| p.indices("waypoints", w))
    }
}

/// Options of the `table` service.
#[derive(Debug, Clone, PartialEq)]
pub struct TableOptions {
    pub sources: Indices,
    pub destinations: Indices,
    pub annotations: Vec<TableAnnotation>,
    /// Speed in m/s used to estimate unroutable pairs.
    pub fallback_speed: Option<f64>,
    pub fallback_coordinate: FallbackCoordinate,
    pub scale_factor: Option<f64>,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            sources: Indices::All,
            destinations: Indices::All,
            annotations: vec![TableAnnotation::Duration],
            fallback_speed: None,
            fallback_coordinate: FallbackCoordinate::Input,
            scale_factor: None,
        }
    }
}

impl TableOptions {
    pub fn params(&self) -> Params {
        let p = self.sources.apply("sources", Params::new());
        let p = self.destinations.apply("destinations", p);
        let annotations: Vec<&str> = self.annotations.iter().map(|a| a.as_str()).collect();
        p.words("annotations", &annotations)
            .maybe(self.fallback_speed, |p, v| p.number("fallback_speed", v))
            .word("fallback_coordinate", self.fallback_coordinate)
            .maybe(self.scale_factor, |p, v| p.number("scale_factor", v))
    }
}

/// Options of the `match` service.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOptions {
    pub steps: bool,
    pub geometries: Geometries,
    pub annotations: Annotations,
    pub overview: Overview,
    /// Seconds since the UNIX epoch, monotonically increasing.
    pub timestamps: Option<Vec<u64>>,
    /// GPS precision standard deviation in metres.
    pub radiuses: Option<Vec<f64>>,
    pub gaps: Gaps,
    pub tidy: bool,
    pub waypoints: Option<Vec<usize>>,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            steps: false,
            geometries: Geometries::Polyline,
            annotations: Annotations::False,
            overview: Overview::Simplified,
            timestamps: None,
            radiuses: None,
            gaps: Gaps::Split,
            tidy: false,
            waypoints: None,
        }
    }
}

impl MatchOptions {
    pub fn params(&self) -> Params {
        let p = Params::new()
            .flag("steps", self.steps)
            .word("geometries", self.geometries);
        self.annotations
            .apply(p)
            .word("overview", self.overview)
            .maybe(self.timestamps.as_deref(), |p, t| p.integers("timestamps", t))
            .maybe(self.radiuses.as_deref(), |p, r| p.numbers("radiuses", r))
            .word("gaps", self.gaps)
            .flag("tidy", self.tidy)
            .maybe(self.waypoints.as_deref(), |p, w| p.indices("waypoints", w))
    }
}

/// Options of the `trip` service.
#[derive(Debug, Clone, PartialEq)]
pub struct TripOptions {
    pub roundtrip: bool,
    pub source: TripSource,
    pub destination: TripDestination,
    pub steps: bool,
    pub annotations: Annotations,
    pub geometries: Geometries,
    pub overview: Overview,
}

impl Default for TripOptions {
    fn default() -> Self {
        Self {
            roundtrip: true,
            source: TripSource::Any,
            destination: TripDestination::Any,
            steps: false,
            annotations: Annotations::False,
            geometries: Geometries::Polyline,
            overview: Overview::Simplified,
        }
    }
}

impl TripOptions {
    /// Options for a delivery tour that leaves from the first coordinate
    /// and returns to it.
    pub fn from_warehouse() -> Self {
        Self {
            source: TripSource::First,
            overview: Overview::Full,
            ..Self::default()
        }
    }

    pub fn params(&self) -> Params {
        let p = Params::new()
            .flag("roundtrip", self.roundtrip)
            .word("source", self.source)
            .word("destination", self.destination)
            .flag("steps", self.steps);
        self.annotations
            .apply(p)
            .word("geometries", self.geometries)
            .word("overview", self.overview)
    }
}
