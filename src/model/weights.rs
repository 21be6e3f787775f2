use std::collections::BTreeMap;

/// Exact-match answer → weight lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightTable {
    entries: BTreeMap<String, f64>,
    fallback: Option<f64>,
}

impl WeightTable {
    pub fn from_pairs(pairs: &[(&str, f64)], fallback: Option<f64>) -> Self {
        let entries = pairs
            .iter()
            .map(|&(answer, weight)| (answer.to_string(), weight))
            .collect();
        Self { entries, fallback }
    }

    pub fn get(&self, answer: &str) -> Option<f64> {
        self.entries.get(answer).copied()
    }

    pub fn fallback(&self) -> Option<f64> {
        self.fallback
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, answer: &str) -> bool {
        self.entries.contains_key(answer)
    }

    /// Adds every unseen value with the fallback weight. Returns the values added,
    /// in first-seen order. A table without a fallback is left unchanged.
    pub fn extend_with_fallback<'a>(
        &mut self,
        values: impl IntoIterator<Item = &'a str>,
    ) -> Vec<String> {
        let Some(fallback) = self.fallback else {
            return Vec::new();
        };
        let mut added = Vec::new();
        for value in values {
            if !self.contains(value) {
                self.entries.insert(value.to_string(), fallback);
                added.push(value.to_string());
            }
        }
        added
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnmappedPolicy {
    /// Unmapped vaccination or study-status answers leave the score undefined.
    Missing,
    /// The first unmapped answer aborts scoring.
    Strict,
}

impl UnmappedPolicy {
    pub fn name(self) -> &'static str {
        match self {
            UnmappedPolicy::Missing => "missing",
            UnmappedPolicy::Strict => "strict",
        }
    }
}

#[derive(Debug, Clone)]
pub struct WeightProfile {
    pub vaccination_weight: f64,
    pub destination_weight: f64,
    pub status_weight: f64,
    pub vaccination: WeightTable,
    pub destination: WeightTable,
    pub status: WeightTable,
    pub unmapped: UnmappedPolicy,
}

const VACCINATION_V1: &[(&str, f64)] = &[
    ("Yes - 3 doses", 1.0),
    ("Yes - 2 doses", 1.0),
    ("3 doses", 1.0),
    ("I'm planning to be vaccinated soon", 0.5),
    ("No (I don't intend to get vaccinated)", 0.2),
    ("Yes - 1 dose", 0.5),
];

const DESTINATION_V1: &[(&str, f64)] = &[
    ("Australia", 1.0),
    ("Canada", 1.0),
    ("United States", 1.0),
    ("United Kingdom", 1.0),
    ("Still Deciding (Not Sure)", 0.5),
];

const STATUS_V1: &[(&str, f64)] = &[
    ("Already studying abroad", 1.0),
    ("Considering studies abroad", 1.0),
    ("Not Interested", 0.3),
    ("Not Sure", 0.5),
    ("Pursuing/ Completed High School", 0.4),
];

pub const DESTINATION_FALLBACK: f64 = 0.5;

impl WeightProfile {
    pub fn default_v1() -> Self {
        Self {
            vaccination_weight: 0.4,
            destination_weight: 0.3,
            status_weight: 0.3,
            vaccination: WeightTable::from_pairs(VACCINATION_V1, None),
            destination: WeightTable::from_pairs(DESTINATION_V1, Some(DESTINATION_FALLBACK)),
            status: WeightTable::from_pairs(STATUS_V1, None),
            unmapped: UnmappedPolicy::Missing,
        }
    }

    pub fn strict_v1() -> Self {
        let mut base = Self::default_v1();
        base.unmapped = UnmappedPolicy::Strict;
        base
    }

    pub fn validate(&self) -> Result<(), String> {
        let weights = [
            ("vaccination", self.vaccination_weight),
            ("destination", self.destination_weight),
            ("study_status", self.status_weight),
        ];
        for (name, w) in weights {
            if !(0.0..=1.0).contains(&w) {
                return Err(format!("{name} field weight {w} is outside [0, 1]"));
            }
        }
        let sum: f64 = weights.iter().map(|(_, w)| w).sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(format!("field weights sum to {sum}, expected 1.0"));
        }
        let tables = [
            ("vaccination", &self.vaccination),
            ("destination", &self.destination),
            ("study_status", &self.status),
        ];
        for (name, table) in tables {
            if let Some((answer, w)) = table.iter().find(|(_, w)| !(0.0..=1.0).contains(w)) {
                return Err(format!(
                    "{name} weight for {answer:?} is {w}, outside [0, 1]"
                ));
            }
            if let Some(f) = table.fallback().filter(|f| !(0.0..=1.0).contains(f)) {
                return Err(format!("{name} fallback weight {f} is outside [0, 1]"));
            }
        }
        Ok(())
    }
}

pub fn clip01(x: f64) -> f64 {
    if x < 0.0 {
        0.0
    } else if x > 1.0 {
        1.0
    } else {
        x
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/weights.rs"]
mod tests;
