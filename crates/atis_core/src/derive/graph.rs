use std::collections::BTreeMap;

use crate::config::Settings;
use crate::format::{FieldFormatter, WindComponents};
use crate::models::{AltimeterUnit, DerivedFieldId, RawFieldId, ValidValues};

/// Current text of every derived phrase.
///
/// A phrase is `None` while one of its required inputs has never been
/// valid, or (for the spread advisory) while no advisory is due.
#[derive(Debug, Clone)]
pub struct DerivationGraph {
    formatter: FieldFormatter,
    spread_threshold: u8,
    visibility_ceiling: u32,
    phrases: BTreeMap<DerivedFieldId, Option<String>>,
}

impl DerivationGraph {
    pub fn new(settings: &Settings) -> Self {
        Self {
            formatter: FieldFormatter::new(settings),
            spread_threshold: settings.advisory.spread_threshold,
            visibility_ceiling: settings.visibility.ceiling,
            phrases: DerivedFieldId::all().iter().map(|id| (*id, None)).collect(),
        }
    }

    /// Recompute the phrases that depend on `field` and return their ids.
    pub fn on_raw_field_changed(
        &mut self,
        field: RawFieldId,
        values: &ValidValues,
    ) -> Vec<DerivedFieldId> {
        let affected = field.dependents();
        for id in &affected {
            let text = self.compute(*id, values);
            self.phrases.insert(*id, text);
        }
        affected
    }

    /// Recompute every phrase.
    pub fn recompute_all(&mut self, values: &ValidValues) -> Vec<DerivedFieldId> {
        let all = DerivedFieldId::all().to_vec();
        for id in &all {
            let text = self.compute(*id, values);
            self.phrases.insert(*id, text);
        }
        all
    }

    pub fn get(&self, id: DerivedFieldId) -> Option<&str> {
        self.phrases.get(&id).and_then(|p| p.as_deref())
    }

    pub fn phrases(&self) -> &BTreeMap<DerivedFieldId, Option<String>> {
        &self.phrases
    }

    /// Pure computation of one phrase from last-valid values.
    pub fn compute(&self, id: DerivedFieldId, values: &ValidValues) -> Option<String> {
        match id {
            DerivedFieldId::WindPhrase => {
                WindComponents::from_values(values).map(|w| self.formatter.wind(&w))
            }
            DerivedFieldId::SpreadWarning => {
                let temp = values.celsius(RawFieldId::Temperature)?;
                let dew = values.celsius(RawFieldId::Dewpoint)?;
                let spread = temp - dew;
                (spread < i16::from(self.spread_threshold))
                    .then(|| format!("LOW SPREAD {}", spread))
            }
            DerivedFieldId::VisibilityPhrase => values.visibility().map(|v| {
                if v.is_at_least(self.visibility_ceiling) {
                    format!("VISIBILITY {}SM OR GREATER", self.visibility_ceiling)
                } else {
                    format!("VISIBILITY {}SM", v)
                }
            }),
            DerivedFieldId::AltimeterPhrase => values.altimeter().map(|a| {
                let label = match self.formatter.altimeter_unit() {
                    AltimeterUnit::InHg => "ALTIMETER",
                    AltimeterUnit::Hpa => "QNH",
                };
                format!("{} {}", label, self.formatter.altimeter_group(a))
            }),
        }
    }
}
