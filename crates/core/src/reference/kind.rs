//! The closed set of reference-data kinds the catalog serves.

use serde::{Deserialize, Serialize};

/// One category of lookup data used to populate product forms.
///
/// The set is fixed by the backend; every kind is cached and refreshed
/// through the same generic store rather than a hand-written store per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Supplier,
    Material,
    Pattern,
    Size,
    Surface,
    Color,
    Origin,
    Factory,
    CompanyCode,
    Processing,
    Storage,
    AntiSlipLevel,
    WaterAbsorptionLevel,
    Area,
    CalculatedUnit,
}

impl ReferenceKind {
    /// Every kind, in the order the full metadata load fetches them.
    pub const ALL: [ReferenceKind; 15] = [
        ReferenceKind::Supplier,
        ReferenceKind::Material,
        ReferenceKind::Pattern,
        ReferenceKind::Size,
        ReferenceKind::Surface,
        ReferenceKind::Color,
        ReferenceKind::Origin,
        ReferenceKind::Factory,
        ReferenceKind::CompanyCode,
        ReferenceKind::Processing,
        ReferenceKind::Storage,
        ReferenceKind::AntiSlipLevel,
        ReferenceKind::WaterAbsorptionLevel,
        ReferenceKind::Area,
        ReferenceKind::CalculatedUnit,
    ];

    /// Stable identifier used in storage documents and event payloads.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::Supplier => "supplier",
            ReferenceKind::Material => "material",
            ReferenceKind::Pattern => "pattern",
            ReferenceKind::Size => "size",
            ReferenceKind::Surface => "surface",
            ReferenceKind::Color => "color",
            ReferenceKind::Origin => "origin",
            ReferenceKind::Factory => "factory",
            ReferenceKind::CompanyCode => "company_code",
            ReferenceKind::Processing => "processing",
            ReferenceKind::Storage => "storage",
            ReferenceKind::AntiSlipLevel => "anti_slip_level",
            ReferenceKind::WaterAbsorptionLevel => "water_absorption_level",
            ReferenceKind::Area => "area",
            ReferenceKind::CalculatedUnit => "calculated_unit",
        }
    }

    /// Path segment of the backend list endpoint for this kind.
    pub const fn api_path(&self) -> &'static str {
        match self {
            ReferenceKind::Supplier => "suppliers",
            ReferenceKind::Material => "materials",
            ReferenceKind::Pattern => "patterns",
            ReferenceKind::Size => "sizes",
            ReferenceKind::Surface => "surfaces",
            ReferenceKind::Color => "colors",
            ReferenceKind::Origin => "origins",
            ReferenceKind::Factory => "factories",
            ReferenceKind::CompanyCode => "company-codes",
            ReferenceKind::Processing => "processings",
            ReferenceKind::Storage => "storages",
            ReferenceKind::AntiSlipLevel => "anti-slip-levels",
            ReferenceKind::WaterAbsorptionLevel => "water-absorption-levels",
            ReferenceKind::Area => "areas",
            ReferenceKind::CalculatedUnit => "calculated-units",
        }
    }
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::ReferenceKind;

    #[test]
    fn serialization_matches_backend_contract() {
        let actual = ReferenceKind::ALL
            .iter()
            .map(|kind| serde_json::to_string(kind).expect("serialize reference kind"))
            .collect::<Vec<_>>();

        let expected = vec![
            "\"supplier\"",
            "\"material\"",
            "\"pattern\"",
            "\"size\"",
            "\"surface\"",
            "\"color\"",
            "\"origin\"",
            "\"factory\"",
            "\"company_code\"",
            "\"processing\"",
            "\"storage\"",
            "\"anti_slip_level\"",
            "\"water_absorption_level\"",
            "\"area\"",
            "\"calculated_unit\"",
        ];

        assert_eq!(actual, expected);
    }

    #[test]
    fn all_covers_every_kind_once() {
        let mut seen = std::collections::HashSet::new();
        for kind in ReferenceKind::ALL {
            assert!(seen.insert(kind.as_str()), "duplicate kind {}", kind);
        }
        assert_eq!(seen.len(), 15);
    }
}
