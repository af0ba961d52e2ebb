//! Field catalogue loader from TOML
//!
//! ```toml
//! [entity]
//! candidates = ["NOMBRE"]
//! keywords = ["NOMBRE", "PLAZA"]
//!
//! [year]
//! candidates = ["AÑO", "ANIO"]
//!
//! [month]
//! candidates = ["MES"]
//!
//! [[categories]]
//! label = "Automobile"
//! candidates = ["AUTOS"]
//! keywords = ["AUTO"]
//! exclude = ["AUTOBUS"]
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use aforo_domain::model::{Catalogue, FieldSpec};
use aforo_types::{ConfigError, Error, Result};

/// Load a catalogue from a TOML file
pub fn load_from_file(path: &Path) -> Result<Catalogue> {
    let content = fs::read_to_string(path).map_err(|e| {
        Error::Config(ConfigError::ParseError(format!(
            "Failed to read catalogue file {}: {}",
            path.display(),
            e
        )))
    })?;

    load_from_str(&content)
}

/// Load a catalogue from a TOML string
pub fn load_from_str(toml_content: &str) -> Result<Catalogue> {
    let catalogue: Catalogue = toml::from_str(toml_content).map_err(|e| {
        Error::Config(ConfigError::ParseError(format!(
            "Failed to parse catalogue TOML: {}",
            e
        )))
    })?;

    validate(&catalogue)?;
    Ok(catalogue)
}

/// Render a catalogue as TOML, e.g. the default one as an editable template
pub fn to_toml(catalogue: &Catalogue) -> Result<String> {
    toml::to_string_pretty(catalogue)
        .map_err(|e| Error::Config(ConfigError::SaveError(e.to_string())))
}

fn validate(catalogue: &Catalogue) -> Result<()> {
    let invalid = |msg: String| Error::Config(ConfigError::ParseError(msg));

    for (name, spec) in [
        ("entity", &catalogue.entity),
        ("year", &catalogue.year),
        ("month", &catalogue.month),
    ] {
        if is_unmatchable(spec) {
            return Err(invalid(format!("field '{}' has no candidates or keywords", name)));
        }
    }

    if catalogue.categories.is_empty() {
        return Err(invalid("catalogue defines no categories".to_string()));
    }

    let mut labels = HashSet::new();
    for category in &catalogue.categories {
        if category.label.trim().is_empty() {
            return Err(invalid("category with empty label".to_string()));
        }
        if !labels.insert(category.label.as_str()) {
            return Err(invalid(format!("duplicate category '{}'", category.label)));
        }
        if is_unmatchable(&category.spec) {
            return Err(invalid(format!(
                "category '{}' has no candidates or keywords",
                category.label
            )));
        }
    }

    Ok(())
}

fn is_unmatchable(spec: &FieldSpec) -> bool {
    spec.candidates.is_empty() && spec.keywords.is_empty()
}
