use serde::{Deserialize, Serialize};

/// Declares a closed set of labels stored as TEXT columns.
///
/// Each variant maps to exactly one stored label; the same label is used on
/// the wire so clients see what the database holds.
macro_rules! choice_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Convert from a stored label (exact match)
            pub fn from_label(s: &str) -> Option<Self> {
                match s {
                    $($label => Some($name::$variant),)+
                    _ => None,
                }
            }

            /// Convert to the stored label
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl TryFrom<&str> for $name {
            type Error = String;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::from_label(value)
                    .ok_or_else(|| format!("Invalid {}: {}", stringify!($name), value))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

choice_enum!(
    VehicleCategory {
        TwoWheeler => "Two Wheeler",
        FourWheeler => "Four Wheeler",
        HeavyVehicle => "Heavy Vehicle",
    }
);

choice_enum!(
    FuelType {
        Petrol => "Petrol",
        Diesel => "Diesel",
        Cng => "CNG",
        Electric => "Electric",
    }
);

choice_enum!(
    TripPurpose {
        Business => "Business",
        Personal => "Personal",
        Commute => "Commute",
        Delivery => "Delivery",
    }
);

choice_enum!(
    ExpenseType {
        Maintenance => "Maintenance",
        Insurance => "Insurance",
        Toll => "Toll",
        Fine => "Fine",
        Cleaning => "Cleaning",
        Tax => "Tax",
        Accessories => "Accessories",
        Other => "Other",
    }
);

choice_enum!(
    ServiceType {
        Oil => "oil",
        Tyre => "tyre",
        General => "general",
    }
);

choice_enum!(
    CarType {
        Hatchback => "Hatchback",
        Sedan => "Sedan",
        Suv => "SUV",
        Ev => "EV",
    }
);

impl Default for VehicleCategory {
    fn default() -> Self {
        VehicleCategory::FourWheeler
    }
}

impl Default for FuelType {
    fn default() -> Self {
        FuelType::Petrol
    }
}

impl Default for TripPurpose {
    fn default() -> Self {
        TripPurpose::Personal
    }
}

impl ExpenseType {
    /// Human readable label shown in reports.
    pub fn display_name(self) -> &'static str {
        match self {
            ExpenseType::Maintenance => "Maintenance / Service",
            ExpenseType::Insurance => "Insurance",
            ExpenseType::Toll => "Toll / Parking",
            ExpenseType::Fine => "Traffic Fine",
            ExpenseType::Cleaning => "Cleaning / Wash",
            ExpenseType::Tax => "Tax / Registration",
            ExpenseType::Accessories => "Accessories",
            ExpenseType::Other => "Other",
        }
    }
}

impl ServiceType {
    pub fn display_name(self) -> &'static str {
        match self {
            ServiceType::Oil => "Oil Change",
            ServiceType::Tyre => "Tyre Change",
            ServiceType::General => "General Service",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_match_stored_values() {
        assert_eq!(VehicleCategory::TwoWheeler.as_str(), "Two Wheeler");
        assert_eq!(FuelType::Cng.as_str(), "CNG");
        assert_eq!(ServiceType::Tyre.as_str(), "tyre");
        assert_eq!(CarType::Suv.to_string(), "SUV");
    }

    #[test]
    fn serde_uses_stored_labels() {
        let json = serde_json::to_string(&VehicleCategory::HeavyVehicle).unwrap();
        assert_eq!(json, "\"Heavy Vehicle\"");
        let parsed: ExpenseType = serde_json::from_str("\"Toll\"").unwrap();
        assert_eq!(parsed, ExpenseType::Toll);
        assert!(serde_json::from_str::<ServiceType>("\"Oil\"").is_err());
    }

    #[test]
    fn try_from_rejects_unknown_labels() {
        assert_eq!(TripPurpose::try_from("Commute"), Ok(TripPurpose::Commute));
        assert!(TripPurpose::try_from("Joyride").is_err());
        assert_eq!(CarType::from_label("EV"), Some(CarType::Ev));
    }

    #[test]
    fn defaults_follow_form_defaults() {
        assert_eq!(VehicleCategory::default(), VehicleCategory::FourWheeler);
        assert_eq!(FuelType::default(), FuelType::Petrol);
        assert_eq!(TripPurpose::default(), TripPurpose::Personal);
        assert_eq!(ExpenseType::Fine.display_name(), "Traffic Fine");
        assert_eq!(ServiceType::General.display_name(), "General Service");
    }
}
