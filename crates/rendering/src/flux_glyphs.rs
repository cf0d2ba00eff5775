//! Flux glyph mapper.
//!
//! Each known (component, term) pair in the flux record becomes an arrow at
//! the component's anchor. The arrow points up or down according to the
//! term's sign convention and its shaft grows with the magnitude. Incoming
//! shortwave is drawn separately as a shower of downward arrows above the
//! canopy, sized from `Q_solar`.
//!
//! Terms missing from the record, terms at or below the draw threshold, and
//! terms the table does not list produce no glyph. The `net` balance term is
//! never drawn.

use bevy::prelude::*;
use rand::Rng;

use scenario::config::FLUX_DRAW_THRESHOLD;
use scenario::parameters::enabled_value;
use scenario::{Component, FluxRecord, SimulationParameters};

// =============================================================================
// Categories and filter
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FluxCategory {
    Solar,
    Longwave,
    Sensible,
    Latent,
    Conduction,
    Melt,
}

impl FluxCategory {
    pub const ALL: [FluxCategory; 6] = [
        FluxCategory::Solar,
        FluxCategory::Longwave,
        FluxCategory::Sensible,
        FluxCategory::Latent,
        FluxCategory::Conduction,
        FluxCategory::Melt,
    ];

    fn index(self) -> usize {
        match self {
            FluxCategory::Solar => 0,
            FluxCategory::Longwave => 1,
            FluxCategory::Sensible => 2,
            FluxCategory::Latent => 3,
            FluxCategory::Conduction => 4,
            FluxCategory::Melt => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FluxCategory::Solar => "Solar",
            FluxCategory::Longwave => "Longwave",
            FluxCategory::Sensible => "Sensible heat",
            FluxCategory::Latent => "Latent heat",
            FluxCategory::Conduction => "Conduction",
            FluxCategory::Melt => "Snow melt",
        }
    }

    pub fn color(self) -> Color {
        match self {
            FluxCategory::Solar => Color::srgb(1.0, 0.85, 0.1),
            FluxCategory::Longwave => Color::srgb(0.6, 0.3, 0.85),
            FluxCategory::Sensible => Color::srgb(0.95, 0.35, 0.15),
            FluxCategory::Latent => Color::srgb(0.2, 0.45, 0.95),
            FluxCategory::Conduction => Color::srgb(0.55, 0.35, 0.2),
            FluxCategory::Melt => Color::srgb(0.3, 0.9, 0.95),
        }
    }

    /// Sideways offset from the component anchor so categories sharing an
    /// anchor stay apart.
    fn lateral_offset(self) -> Vec3 {
        match self {
            FluxCategory::Solar => Vec3::ZERO,
            FluxCategory::Longwave => Vec3::new(-1.2, 0.0, 0.0),
            FluxCategory::Sensible => Vec3::new(1.2, 0.0, 0.0),
            FluxCategory::Latent => Vec3::new(0.0, 0.0, 1.2),
            FluxCategory::Conduction => Vec3::new(0.0, 0.0, -1.2),
            FluxCategory::Melt => Vec3::new(1.2, 0.0, 1.2),
        }
    }
}

/// Which glyph categories are currently shown. All on by default.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryFilter {
    enabled: [bool; 6],
}

impl Default for CategoryFilter {
    fn default() -> Self {
        Self { enabled: [true; 6] }
    }
}

impl CategoryFilter {
    pub fn is_enabled(&self, category: FluxCategory) -> bool {
        self.enabled[category.index()]
    }

    pub fn set(&mut self, category: FluxCategory, on: bool) {
        self.enabled[category.index()] = on;
    }

    pub fn toggle(&mut self, category: FluxCategory) {
        let i = category.index();
        self.enabled[i] = !self.enabled[i];
    }
}

/// Visibility of a glyph is a pure function of its category and the filter.
pub fn glyph_visible(filter: &CategoryFilter, category: FluxCategory) -> bool {
    filter.is_enabled(category)
}

// =============================================================================
// Term table
// =============================================================================

/// How a term's sign maps to an arrow direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignConvention {
    /// Negative points down, otherwise up. Net-incoming terms and
    /// inter-component conduction.
    Direct,
    /// Terms reported as a negated outgoing flux: negative points up,
    /// otherwise down.
    Inverted,
}

impl SignConvention {
    pub fn direction(self, value: f32) -> Vec3 {
        match self {
            SignConvention::Direct => {
                if value < 0.0 {
                    Vec3::NEG_Y
                } else {
                    Vec3::Y
                }
            }
            SignConvention::Inverted => {
                if value < 0.0 {
                    Vec3::Y
                } else {
                    Vec3::NEG_Y
                }
            }
        }
    }
}

/// One drawable flux term.
#[derive(Debug, Clone, Copy)]
pub struct TermSpec {
    pub component: Component,
    pub term: &'static str,
    pub category: FluxCategory,
    pub sign: SignConvention,
}

const fn spec(
    component: Component,
    term: &'static str,
    category: FluxCategory,
    sign: SignConvention,
) -> TermSpec {
    TermSpec {
        component,
        term,
        category,
        sign,
    }
}

const DIRECT: SignConvention = SignConvention::Direct;
const INVERTED: SignConvention = SignConvention::Inverted;

/// Every term the mapper draws. Shortwave terms are covered by the solar
/// glyphs; mirrored exchange terms (`LW_to_*`, `cond_from_*`) are not drawn
/// a second time.
///
/// Convective, latent, melt and deep-soil terms arrive as the negation of an
/// outgoing flux and are inverted. `LW_atm` is a net incoming balance and,
/// like the conduction between components, follows its sign.
pub const TERM_TABLE: [TermSpec; 17] = [
    spec(Component::Canopy, "LW_atm", FluxCategory::Longwave, DIRECT),
    spec(Component::Canopy, "conv_atm", FluxCategory::Sensible, INVERTED),
    spec(Component::Canopy, "latent_evap", FluxCategory::Latent, INVERTED),
    spec(Component::Canopy, "latent_photo", FluxCategory::Latent, INVERTED),
    spec(Component::Canopy, "cond_to_trunk", FluxCategory::Conduction, DIRECT),
    spec(Component::Trunk, "LW_atm", FluxCategory::Longwave, DIRECT),
    spec(Component::Trunk, "conv_atm", FluxCategory::Sensible, INVERTED),
    spec(Component::Trunk, "cond_to_soil", FluxCategory::Conduction, DIRECT),
    spec(Component::Trunk, "cond_to_snow", FluxCategory::Conduction, DIRECT),
    spec(Component::Snow, "LW_atm", FluxCategory::Longwave, DIRECT),
    spec(Component::Snow, "conv_atm", FluxCategory::Sensible, INVERTED),
    spec(Component::Snow, "melt_sink", FluxCategory::Melt, INVERTED),
    spec(Component::Snow, "cond_to_soil", FluxCategory::Conduction, DIRECT),
    spec(Component::Soil, "LW_atm", FluxCategory::Longwave, DIRECT),
    spec(Component::Soil, "conv_atm", FluxCategory::Sensible, INVERTED),
    spec(Component::Soil, "latent_evap", FluxCategory::Latent, INVERTED),
    spec(Component::Soil, "cond_to_deep", FluxCategory::Conduction, INVERTED),
];

// =============================================================================
// Glyphs
// =============================================================================

/// An arrow: shaft from `origin` along `direction`, then a cone head.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    pub origin: Vec3,
    /// Unit vector.
    pub direction: Vec3,
    pub shaft_length: f32,
    pub head_length: f32,
    pub head_radius: f32,
    pub color: Color,
    pub category: FluxCategory,
}

impl Glyph {
    pub fn new(origin: Vec3, direction: Vec3, shaft_length: f32, category: FluxCategory) -> Self {
        let head_length = (shaft_length * 0.25).clamp(0.2, 1.2);
        Self {
            origin,
            direction: direction.try_normalize().unwrap_or(Vec3::Y),
            shaft_length,
            head_length,
            head_radius: head_length * 0.5,
            color: category.color(),
            category,
        }
    }

    /// Shaft width, thinner than the head.
    pub fn shaft_radius(&self) -> f32 {
        self.head_radius * 0.35
    }

    /// Point where the shaft ends and the head begins.
    pub fn shaft_end(&self) -> Vec3 {
        self.origin + self.direction * self.shaft_length
    }

    pub fn tip(&self) -> Vec3 {
        self.shaft_end() + self.direction * self.head_length
    }
}

/// All glyphs for one simulation result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlyphSet {
    pub glyphs: Vec<Glyph>,
}

impl GlyphSet {
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn of_category(&self, category: FluxCategory) -> impl Iterator<Item = &Glyph> {
        self.glyphs.iter().filter(move |g| g.category == category)
    }

    /// Glyphs the filter leaves visible.
    pub fn visible<'a>(&'a self, filter: &'a CategoryFilter) -> impl Iterator<Item = &'a Glyph> {
        self.glyphs
            .iter()
            .filter(move |g| glyph_visible(filter, g.category))
    }
}

// =============================================================================
// Pure helpers
// =============================================================================

/// Shaft length for a flux magnitude in W m-2.
pub fn shaft_length(value: f32) -> f32 {
    0.5 + value.abs() / 40.0
}

/// Where a component's glyphs start.
pub fn anchor(component: Component, params: &SimulationParameters) -> Vec3 {
    let h = params.canopy_height();
    match component {
        Component::Canopy => Vec3::new(0.0, 0.8 * h, 0.0),
        Component::Trunk => Vec3::new(0.0, 0.4 * h, 0.0),
        Component::Snow => Vec3::new(0.0, enabled_value(params.h_snow).max(0.0) + 0.1, 0.0),
        Component::Soil => Vec3::new(0.0, 0.1, 0.0),
    }
}

/// Number of solar arrows for an incoming shortwave flux.
pub fn solar_arrow_count(q_solar: f32) -> usize {
    ((q_solar / 150.0).floor() as usize).clamp(1, 5)
}

pub fn solar_arrow_length(q_solar: f32) -> f32 {
    4.0 * (q_solar / 800.0)
}

/// Height above the canopy top where solar arrows start.
const SOLAR_CLEARANCE: f32 = 4.0;
const SOLAR_SPREAD: f32 = 3.0;

// =============================================================================
// Mapper
// =============================================================================

/// Map a flux record to glyphs.
pub fn map_fluxes<R: Rng + ?Sized>(
    fluxes: &FluxRecord,
    params: &SimulationParameters,
    rng: &mut R,
) -> GlyphSet {
    let mut glyphs = Vec::new();

    if let Some(q) = params.q_solar.filter(|q| q.is_finite() && *q > FLUX_DRAW_THRESHOLD) {
        let top = params.canopy_height() + SOLAR_CLEARANCE;
        let length = solar_arrow_length(q);
        for _ in 0..solar_arrow_count(q) {
            let origin = Vec3::new(
                rng.gen_range(-SOLAR_SPREAD..SOLAR_SPREAD),
                top + length + rng.gen_range(0.0..1.0),
                rng.gen_range(-SOLAR_SPREAD..SOLAR_SPREAD),
            );
            glyphs.push(Glyph::new(origin, Vec3::NEG_Y, length, FluxCategory::Solar));
        }
    }

    for entry in TERM_TABLE.iter() {
        if !fluxes.has_component(entry.component) {
            continue;
        }
        let Some(value) = fluxes.get(entry.component, entry.term) else {
            continue;
        };
        if value.abs() <= FLUX_DRAW_THRESHOLD {
            continue;
        }
        let origin = anchor(entry.component, params) + entry.category.lateral_offset();
        glyphs.push(Glyph::new(
            origin,
            entry.sign.direction(value),
            shaft_length(value),
            entry.category,
        ));
    }

    GlyphSet { glyphs }
}
