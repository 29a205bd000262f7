//! Closed label sets the classifier must choose from.
//!
//! Both enums serialize to their human-readable label and fall back to
//! `Unknown` for any label they do not recognise, so a model answering
//! outside the list never fails deserialization.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

macro_rules! taxonomy {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal,)+ }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
            #[serde(rename = "unknown", other)]
            Unknown,
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+ $name::Unknown];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                    $name::Unknown => "unknown",
                }
            }

            /// Case- and whitespace-insensitive lookup; unrecognised labels are `Unknown`.
            pub fn from_label(label: &str) -> Self {
                let label = label.trim().to_lowercase();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == label)
                    .unwrap_or($name::Unknown)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::Unknown
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

taxonomy! {
    /// Canonical data, AI, and software roles.
    JobTitle {
        DataAnalyst => "data analyst",
        BusinessAnalyst => "business analyst",
        AnalyticsEngineer => "analytics engineer",
        BiDeveloper => "business intelligence developer",
        BiAnalyst => "business intelligence analyst",
        DataScientist => "data scientist",
        ResearchScientist => "research scientist",
        MachineLearningEngineer => "machine learning engineer",
        MlopsEngineer => "mlops engineer",
        DataEngineer => "data engineer",
        DataArchitect => "data architect",
        DataQualityEngineer => "data quality engineer",
        DataGovernanceSpecialist => "data governance specialist",
        DataProductManager => "data product manager",
        AnalyticsProductManager => "analytics product manager",
        SoftwareEngineer => "software engineer",
        BackendEngineer => "backend engineer",
        FrontendEngineer => "frontend engineer",
        FullStackEngineer => "full stack engineer",
        DevopsEngineer => "devops engineer",
        CloudEngineer => "cloud engineer",
        SecurityEngineer => "security engineer",
    }
}

taxonomy! {
    /// Seniority inferred from title and description.
    Seniority {
        Intern => "intern",
        Junior => "junior",
        Mid => "mid",
        Senior => "senior",
        Staff => "staff",
        Associate => "associate",
        Principal => "principal",
        Lead => "lead",
        Manager => "manager",
        Director => "director",
        Vp => "vp",
        CLevel => "c-level",
    }
}
