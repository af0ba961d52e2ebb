//! Field catalogue: candidate column names and keywords per logical field
//!
//! Spellings live here as data so supporting a new export is a table edit.

use serde::{Deserialize, Serialize};

use super::field::LogicalField;

/// How to find one logical field in a header
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Exact, case-sensitive names tried in order
    pub candidates: Vec<String>,
    /// Case-insensitive substrings for the fallback scan
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Headers containing any of these never match by keyword
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl FieldSpec {
    fn new(candidates: &[&str], keywords: &[&str]) -> Self {
        Self {
            candidates: candidates.iter().map(|s| s.to_string()).collect(),
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            exclude: Vec::new(),
        }
    }

    fn excluding(mut self, exclude: &[&str]) -> Self {
        self.exclude = exclude.iter().map(|s| s.to_string()).collect();
        self
    }
}

/// Vehicle category with its logical label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySpec {
    pub label: String,
    #[serde(flatten)]
    pub spec: FieldSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalogue {
    pub entity: FieldSpec,
    pub year: FieldSpec,
    pub month: FieldSpec,
    pub categories: Vec<CategorySpec>,
}

impl Catalogue {
    /// All fields in resolution order: entity, year, month, then categories
    pub fn fields(&self) -> Vec<(LogicalField, &FieldSpec)> {
        let mut fields = vec![
            (LogicalField::Entity, &self.entity),
            (LogicalField::Year, &self.year),
            (LogicalField::Month, &self.month),
        ];
        fields.extend(
            self.categories
                .iter()
                .map(|c| (LogicalField::category(c.label.clone()), &c.spec)),
        );
        fields
    }

    /// Category fields in catalogue order (the default melt set)
    pub fn category_fields(&self) -> Vec<LogicalField> {
        self.categories
            .iter()
            .map(|c| LogicalField::category(c.label.clone()))
            .collect()
    }
}

impl Default for Catalogue {
    fn default() -> Self {
        let mut categories = vec![
            category(
                "Automobile",
                FieldSpec::new(
                    &["AUTOS", "AUTOMOVIL", "Automovil", "automovil"],
                    &["AUTOMOVIL", "AUTO"],
                )
                .excluding(&["AUTOBUS"]),
            ),
            category(
                "Motorcycle",
                FieldSpec::new(
                    &["MOTOS", "MOTOCICLETA", "Motocicleta", "motocicleta"],
                    &["MOTO"],
                ),
            ),
        ];

        for axles in 2..=4 {
            let mut candidates = vec![
                format!("AUTOBUS DE {} EJES", axles),
                format!("AUTOBUS_{}_EJES", axles),
                format!("Autobus_{}_Ejes", axles),
                format!("autobus_{}_ejes", axles),
            ];
            // Exports with a single bus column count it as 2-axle
            if axles == 2 {
                candidates.extend(
                    ["AUTOBUS", "Autobus", "autobus", "AUTOBÚS", "Autobús", "autobús"].map(String::from),
                );
            }
            categories.push(CategorySpec {
                label: format!("Bus {} axles", axles),
                spec: FieldSpec {
                    candidates,
                    keywords: vec![
                        format!("AUTOBUS_{}", axles),
                        format!("AUTOBUS DE {}", axles),
                        format!("BUS {}", axles),
                    ],
                    exclude: Vec::new(),
                },
            });
        }

        for axles in 2..=9 {
            categories.push(CategorySpec {
                label: format!("Truck {} axles", axles),
                spec: FieldSpec {
                    candidates: vec![
                        format!("CAMIONES DE {} EJES", axles),
                        format!("CAMION_{}_EJES", axles),
                        format!("Camion_{}_Ejes", axles),
                        format!("camion_{}_ejes", axles),
                    ],
                    keywords: vec![
                        format!("CAMION_{}", axles),
                        format!("CAMIONES DE {}", axles),
                        format!("CAMION {}", axles),
                    ],
                    exclude: Vec::new(),
                },
            });
        }

        categories.push(category(
            "Tricycle",
            FieldSpec::new(&["TRICICLOS", "TRICICLO", "Triciclos"], &["TRICICLO"]),
        ));

        Self {
            entity: FieldSpec::new(
                &["NOMBRE", "Nombre", "nombre", "PLAZA", "Plaza", "CASETA"],
                &["NOMBRE", "PLAZA", "CASETA"],
            ),
            year: FieldSpec::new(&["AÑO", "Año", "año", "ANIO", "Anio", "anio"], &["AÑO", "ANIO"]),
            month: FieldSpec::new(&["MES", "Mes", "mes"], &["MES"]),
            categories,
        }
    }
}

fn category(label: &str, spec: FieldSpec) -> CategorySpec {
    CategorySpec {
        label: label.to_string(),
        spec,
    }
}
