//! Wind group rendering.

use crate::models::{RawFieldId, ValidValues, WindStyle};

/// The four wind inputs, resolved from last-valid values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindComponents {
    pub variable: bool,
    /// Degrees true. Ignored when `variable` is set.
    pub direction: Option<u16>,
    pub velocity: u16,
    pub gust: Option<u16>,
}

impl WindComponents {
    /// Resolve from last-valid values.
    ///
    /// None until a velocity is known and, unless the wind is variable or
    /// calm, a direction too.
    pub fn from_values(values: &ValidValues) -> Option<Self> {
        let variable = values.flag(RawFieldId::WindVariableFlag).unwrap_or(false);
        let velocity = values.velocity()?;
        let direction = values.direction();
        let gust = values.gust();
        let calm = velocity == 0 && gust.is_none();
        if !variable && !calm && direction.is_none() {
            return None;
        }
        Some(Self {
            variable,
            direction,
            velocity,
            gust,
        })
    }

    /// No steady wind and no gust. A gust over a zero velocity is not calm.
    pub fn is_calm(&self) -> bool {
        self.velocity == 0 && self.gust.is_none()
    }

    /// Direction as broadcast: 000 is reserved for calm, so a north wind
    /// with speed reads 360.
    fn broadcast_direction(&self) -> u16 {
        match self.direction.unwrap_or(0) {
            0 => 360,
            d => d,
        }
    }
}

/// Render a wind group in the given style.
pub fn wind_group(wind: &WindComponents, style: WindStyle) -> String {
    match style {
        WindStyle::Compact => compact(wind),
        WindStyle::Spoken => spoken(wind),
    }
}

fn compact(wind: &WindComponents) -> String {
    if wind.is_calm() {
        return "00000KT".to_string();
    }
    let direction = if wind.variable {
        "VRB".to_string()
    } else {
        format!("{:03}", wind.broadcast_direction())
    };
    let gust = wind
        .gust
        .map(|g| format!("G{:02}", g))
        .unwrap_or_default();
    format!("{}{:02}{}KT", direction, wind.velocity, gust)
}

fn spoken(wind: &WindComponents) -> String {
    if wind.is_calm() {
        return "CALM".to_string();
    }
    let mut out = if wind.variable {
        format!("VARIABLE AT {:02}KT", wind.velocity)
    } else {
        format!("{:03} AT {:02}KT", wind.broadcast_direction(), wind.velocity)
    };
    if let Some(g) = wind.gust {
        out.push_str(&format!(" GUSTS {:02}KT", g));
    }
    out
}
