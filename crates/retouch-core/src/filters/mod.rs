//! Filter library.
//!
//! Filters are named, mutually exclusive preset effects. At most one is
//! active in a session and it runs before the adjustment chain.

pub mod convolution;
pub mod stylize;

use std::fmt;
use std::str::FromStr;

use nanorand::WyRand;
use serde::{Deserialize, Serialize};

use crate::adjustments::detail;
use crate::error::{ensure_finite, EditError};
use crate::raster::Image;

/// One of the catalog filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FilterKind {
    /// No filter.
    #[default]
    Original,
    Blur,
    Contour,
    Detail,
    EdgeEnhance,
    EdgeEnhanceMore,
    Emboss,
    FindEdges,
    Sharpen,
    Smooth,
    SmoothMore,
    Pixelate,
    Glitch,
    Invert,
    Cartoon,
    Sepia,
    Grayscale,
}

/// Number of catalog entries, including `Original`.
pub const FILTER_COUNT: usize = 17;

/// How a filter is invoked.
#[derive(Clone, Copy)]
pub enum FilterFn {
    /// Returns the input unchanged.
    Identity,
    /// Parameterless effect.
    Plain(fn(&Image) -> Result<Image, EditError>),
    /// Effect driven by one numeric parameter.
    Parametric(fn(&Image, f32) -> Result<Image, EditError>),
    /// Effect that draws from a random source.
    Random(fn(&Image, &mut WyRand) -> Result<Image, EditError>),
}

impl fmt::Debug for FilterFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterFn::Identity => "Identity",
            FilterFn::Plain(_) => "Plain",
            FilterFn::Parametric(_) => "Parametric",
            FilterFn::Random(_) => "Random",
        };
        write!(f, "FilterFn::{name}")
    }
}

/// Table row describing one filter.
#[derive(Debug, Clone, Copy)]
pub struct FilterEntry {
    pub kind: FilterKind,
    /// Display name shown by hosts.
    pub name: &'static str,
    /// Parameter used when the selection does not override it.
    pub default_parameter: Option<f32>,
    pub apply: FilterFn,
}

/// Every filter, in catalog order.
pub static FILTERS: [FilterEntry; FILTER_COUNT] = [
    FilterEntry {
        kind: FilterKind::Original,
        name: "Original",
        default_parameter: None,
        apply: FilterFn::Identity,
    },
    FilterEntry {
        kind: FilterKind::Blur,
        name: "Blur",
        default_parameter: Some(5.0),
        apply: FilterFn::Parametric(convolution::gaussian_blur),
    },
    FilterEntry {
        kind: FilterKind::Contour,
        name: "Contour",
        default_parameter: None,
        apply: FilterFn::Plain(convolution::contour),
    },
    FilterEntry {
        kind: FilterKind::Detail,
        name: "Detail",
        default_parameter: None,
        apply: FilterFn::Plain(convolution::detail),
    },
    FilterEntry {
        kind: FilterKind::EdgeEnhance,
        name: "Edge Enhance",
        default_parameter: None,
        apply: FilterFn::Plain(convolution::edge_enhance),
    },
    FilterEntry {
        kind: FilterKind::EdgeEnhanceMore,
        name: "Edge Enhance More",
        default_parameter: None,
        apply: FilterFn::Plain(convolution::edge_enhance_more),
    },
    FilterEntry {
        kind: FilterKind::Emboss,
        name: "Emboss",
        default_parameter: None,
        apply: FilterFn::Plain(convolution::emboss),
    },
    FilterEntry {
        kind: FilterKind::FindEdges,
        name: "Find Edges",
        default_parameter: None,
        apply: FilterFn::Plain(convolution::find_edges),
    },
    FilterEntry {
        kind: FilterKind::Sharpen,
        name: "Sharpen",
        default_parameter: Some(1.5),
        apply: FilterFn::Parametric(detail::sharpness),
    },
    FilterEntry {
        kind: FilterKind::Smooth,
        name: "Smooth",
        default_parameter: None,
        apply: FilterFn::Plain(convolution::smooth),
    },
    FilterEntry {
        kind: FilterKind::SmoothMore,
        name: "Smooth More",
        default_parameter: None,
        apply: FilterFn::Plain(convolution::smooth_more),
    },
    FilterEntry {
        kind: FilterKind::Pixelate,
        name: "Pixelate",
        default_parameter: Some(10.0),
        apply: FilterFn::Parametric(stylize::pixelate),
    },
    FilterEntry {
        kind: FilterKind::Glitch,
        name: "Glitch",
        default_parameter: None,
        apply: FilterFn::Random(stylize::glitch),
    },
    FilterEntry {
        kind: FilterKind::Invert,
        name: "Invert",
        default_parameter: None,
        apply: FilterFn::Plain(stylize::invert),
    },
    FilterEntry {
        kind: FilterKind::Cartoon,
        name: "Cartoon",
        default_parameter: None,
        apply: FilterFn::Plain(stylize::cartoon),
    },
    FilterEntry {
        kind: FilterKind::Sepia,
        name: "Sepia",
        default_parameter: None,
        apply: FilterFn::Plain(stylize::sepia),
    },
    FilterEntry {
        kind: FilterKind::Grayscale,
        name: "Grayscale",
        default_parameter: None,
        apply: FilterFn::Plain(stylize::grayscale),
    },
];

impl FilterKind {
    /// All kinds in catalog order.
    pub const ALL: [FilterKind; FILTER_COUNT] = [
        FilterKind::Original,
        FilterKind::Blur,
        FilterKind::Contour,
        FilterKind::Detail,
        FilterKind::EdgeEnhance,
        FilterKind::EdgeEnhanceMore,
        FilterKind::Emboss,
        FilterKind::FindEdges,
        FilterKind::Sharpen,
        FilterKind::Smooth,
        FilterKind::SmoothMore,
        FilterKind::Pixelate,
        FilterKind::Glitch,
        FilterKind::Invert,
        FilterKind::Cartoon,
        FilterKind::Sepia,
        FilterKind::Grayscale,
    ];

    /// Table row for this kind.
    pub fn entry(self) -> &'static FilterEntry {
        &FILTERS[self as usize]
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        self.entry().name
    }

    /// Default parameter, if the filter takes one.
    pub fn default_parameter(self) -> Option<f32> {
        self.entry().default_parameter
    }

    /// Apply the filter.
    ///
    /// `parameter` overrides the default parameter and is ignored by filters
    /// that take none.
    pub fn apply(
        self,
        image: &Image,
        parameter: Option<f32>,
        rng: &mut WyRand,
    ) -> Result<Image, EditError> {
        image.validate()?;
        match self.entry().apply {
            FilterFn::Identity => Ok(image.clone()),
            FilterFn::Plain(f) => f(image),
            FilterFn::Random(f) => f(image, rng),
            FilterFn::Parametric(f) => {
                // every parametric entry carries a default
                let value = parameter.or(self.default_parameter()).unwrap_or_default();
                f(image, ensure_finite(self.name(), value)?)
            }
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lowercase and drop spaces, underscores and hyphens.
fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl FromStr for FilterKind {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_name(s);
        FILTERS
            .iter()
            .find(|entry| normalize_name(entry.name) == wanted)
            .map(|entry| entry.kind)
            .ok_or_else(|| EditError::UnsupportedFilter(s.to_string()))
    }
}

/// The active filter and its parameter override.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterSelection {
    pub kind: FilterKind,
    /// Overrides the catalog default when set.
    #[serde(default)]
    pub parameter: Option<f32>,
}

impl FilterSelection {
    /// No filter.
    pub fn none() -> Self {
        Self::default()
    }

    /// Select `kind` with its default parameter.
    pub fn new(kind: FilterKind) -> Self {
        Self {
            kind,
            parameter: None,
        }
    }

    /// Select `kind` with an explicit parameter.
    pub fn with_parameter(kind: FilterKind, parameter: f32) -> Self {
        Self {
            kind,
            parameter: Some(parameter),
        }
    }

    /// Whether this selection changes the image at all.
    pub fn is_active(&self) -> bool {
        self.kind != FilterKind::Original
    }

    /// Parameter the filter will run with.
    pub fn effective_parameter(&self) -> Option<f32> {
        self.parameter.or(self.kind.default_parameter())
    }

    /// Run the selected filter.
    pub fn apply(&self, image: &Image, rng: &mut WyRand) -> Result<Image, EditError> {
        self.kind.apply(image, self.parameter, rng)
    }
}

/// Catalog listing for hosts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub default_parameter: Option<f32>,
}

/// Name and default parameter of every filter, in catalog order.
pub fn catalog() -> Vec<CatalogEntry> {
    FILTERS
        .iter()
        .map(|entry| CatalogEntry {
            name: entry.name.to_string(),
            default_parameter: entry.default_parameter,
        })
        .collect()
}
