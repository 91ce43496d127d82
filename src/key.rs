//! Composite keys identifying array elements across FASTA headers, BLAST query
//! ids, and database rows.
//!
//! The pipe-delimited form is `locus_id|element_type|element_id[|cluster_id]`,
//! e.g. `Ecoli_K12_1|spacer|4` or `Ecoli_K12_1|DR|2|7`.

use std::fmt;
use std::str::FromStr;

/// Which kind of array element a key refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    Spacer,
    DirectRepeat,
}

impl ElementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Spacer => "spacer",
            ElementType::DirectRepeat => "DR",
        }
    }
}

impl FromStr for ElementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "spacer" => Ok(ElementType::Spacer),
            "dr" | "repeat" | "direct_repeat" => Ok(ElementType::DirectRepeat),
            _ => Err(format!("Unknown element type: {}. Use 'spacer' or 'DR'", s)),
        }
    }
}

/// Tagged record replacing the pipe-delimited composite element key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementKey {
    pub locus_id: String,
    pub element: ElementType,
    pub element_id: u32,
    /// Cluster membership, present only after clustering.
    pub cluster_id: Option<u32>,
}

impl ElementKey {
    pub fn new(locus_id: impl Into<String>, element: ElementType, element_id: u32) -> Self {
        Self {
            locus_id: locus_id.into(),
            element,
            element_id,
            cluster_id: None,
        }
    }
}

impl fmt::Display for ElementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}",
            self.locus_id,
            self.element.as_str(),
            self.element_id
        )?;
        if let Some(cluster) = self.cluster_id {
            write!(f, "|{}", cluster)?;
        }
        Ok(())
    }
}

impl FromStr for ElementKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('|').collect();
        if parts.len() < 3 || parts.len() > 4 {
            return Err(format!(
                "Malformed element key '{}': expected locus|type|id[|cluster]",
                s
            ));
        }
        let element: ElementType = parts[1].parse()?;
        let element_id: u32 = parts[2]
            .parse()
            .map_err(|_| format!("Malformed element id in key '{}'", s))?;
        let cluster_id = match parts.get(3) {
            Some(raw) => Some(
                raw.parse::<u32>()
                    .map_err(|_| format!("Malformed cluster id in key '{}'", s))?,
            ),
            None => None,
        };
        Ok(ElementKey {
            locus_id: parts[0].to_string(),
            element,
            element_id,
            cluster_id,
        })
    }
}
