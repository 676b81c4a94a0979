// method.rs - Alignment method identifiers and per-method call options

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::str::FromStr;

/// Closed set of benchmarked alignment methods.
///
/// Declaration order is the order used when pairing methods for
/// significance tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Theseus,
    Pymol,
    Matchmaker,
    Mmligner,
    Mda,
}

impl Method {
    pub const ALL: [Method; 5] = [
        Method::Theseus,
        Method::Pymol,
        Method::Matchmaker,
        Method::Mmligner,
        Method::Mda,
    ];

    /// Methods reachable through the programmatic alignment call
    pub const PROGRAMMATIC: [Method; 3] = [Method::Mda, Method::Theseus, Method::Mmligner];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Theseus => "theseus",
            Method::Pymol => "pymol",
            Method::Matchmaker => "matchmaker",
            Method::Mmligner => "mmligner",
            Method::Mda => "mda",
        }
    }

    /// Whether the method is driven by the orchestrator rather than parsed from a transcript
    pub fn is_programmatic(&self) -> bool {
        Self::PROGRAMMATIC.contains(self)
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "theseus" => Ok(Method::Theseus),
            "pymol" => Ok(Method::Pymol),
            "matchmaker" | "mmaker" => Ok(Method::Matchmaker),
            "mmligner" => Ok(Method::Mmligner),
            "mda" => Ok(Method::Mda),
            _ => Err(format!(
                "Unknown method '{}'. Use: theseus, pymol, matchmaker, mmligner, mda",
                s
            )),
        }
    }
}

/// Extra options passed to the alignment call of one method
pub type MethodOptions = BTreeMap<String, String>;

/// Methods to run, each with its resolved extra call options
#[derive(Debug, Clone, PartialEq)]
pub struct MethodTable {
    entries: Vec<(Method, MethodOptions)>,
}

impl Default for MethodTable {
    fn default() -> Self {
        Self::for_methods(&Method::PROGRAMMATIC)
    }
}

impl MethodTable {
    /// Build a table for the given methods with their default options
    pub fn for_methods(methods: &[Method]) -> Self {
        let mut entries: Vec<(Method, MethodOptions)> = Vec::new();
        for &method in methods {
            if entries.iter().any(|(m, _)| *m == method) {
                continue;
            }
            entries.push((method, default_options(method)));
        }
        Self { entries }
    }

    /// Set (or replace) an option for a method already in the table
    pub fn set_option(&mut self, method: Method, key: &str, value: &str) -> Result<(), String> {
        let options = self
            .entries
            .iter_mut()
            .find(|(m, _)| *m == method)
            .map(|(_, o)| o)
            .ok_or_else(|| format!("Method '{}' is not selected for this run", method))?;
        options.insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// Apply an option given as `method:key=value`
    pub fn apply_option(&mut self, option: &str) -> Result<(), String> {
        let (method, assignment) = option
            .split_once(':')
            .ok_or_else(|| format!("Invalid method option '{}'. Expected method:key=value", option))?;
        let (key, value) = assignment
            .split_once('=')
            .ok_or_else(|| format!("Invalid method option '{}'. Expected method:key=value", option))?;
        let method = Method::from_str(method)?;
        self.set_option(method, key.trim(), value.trim())
    }

    pub fn methods(&self) -> impl Iterator<Item = Method> + '_ {
        self.entries.iter().map(|(m, _)| *m)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Method, &MethodOptions)> {
        self.entries.iter().map(|(m, o)| (*m, o))
    }

    pub fn options(&self, method: Method) -> Option<&MethodOptions> {
        self.entries.iter().find(|(m, _)| *m == method).map(|(_, o)| o)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Sequence alignment sub-strategy required by some methods
fn default_options(method: Method) -> MethodOptions {
    let mut options = MethodOptions::new();
    match method {
        Method::Mda => {
            options.insert("alignment_strategy".to_string(), "clustalo".to_string());
        }
        Method::Theseus => {
            options.insert("sequence_alignment".to_string(), "CLUSTALO".to_string());
        }
        _ => {}
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_round_trip() {
        for method in Method::ALL {
            assert_eq!(Method::from_str(method.as_str()).unwrap(), method);
        }
        assert_eq!(Method::from_str("mmaker").unwrap(), Method::Matchmaker);
        assert_eq!(Method::from_str(" MDA ").unwrap(), Method::Mda);
        assert!(Method::from_str("tmalign").is_err());
    }

    #[test]
    fn test_default_table() {
        let table = MethodTable::default();
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.options(Method::Mda).unwrap().get("alignment_strategy"),
            Some(&"clustalo".to_string())
        );
        assert_eq!(
            table.options(Method::Theseus).unwrap().get("sequence_alignment"),
            Some(&"CLUSTALO".to_string())
        );
        assert!(table.options(Method::Mmligner).unwrap().is_empty());
        assert!(table.options(Method::Pymol).is_none());
    }

    #[test]
    fn test_option_arguments() {
        let mut table = MethodTable::for_methods(&[Method::Mmligner, Method::Mmligner]);
        assert_eq!(table.len(), 1);

        table.apply_option("mmligner:ivalue=0.1").unwrap();
        assert_eq!(
            table.options(Method::Mmligner).unwrap().get("ivalue"),
            Some(&"0.1".to_string())
        );

        assert!(table.apply_option("mda:alignment_strategy=clustalo").is_err());
        assert!(table.apply_option("mmligner-ivalue").is_err());
        assert!(table.apply_option("mmligner:ivalue").is_err());
    }
}
