use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// HMO name → tier name → service name → benefit text. All keys are the
/// canonical Hebrew spellings.
pub type ServiceDetails = BTreeMap<String, BTreeMap<String, BTreeMap<String, String>>>;

/// Structured content of one service category page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServicePage {
    pub title: String,
    pub general_description: String,
    /// Per-HMO variant of the introduction.
    #[serde(default)]
    pub specific_description: BTreeMap<String, String>,
    /// Services in page order.
    #[serde(default)]
    pub services_descriptions: Vec<ServiceDescription>,
    #[serde(default)]
    pub services_details: ServiceDetails,
    #[serde(default)]
    pub phone_numbers: TitledSection<String>,
    #[serde(default)]
    pub additional_information: TitledSection<ContactDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDescription {
    pub name: String,
    pub description: String,
}

/// A headed section with one entry per HMO.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitledSection<T> {
    pub title: String,
    pub details: BTreeMap<String, T>,
}

impl<T> Default for TitledSection<T> {
    fn default() -> Self {
        Self {
            title: String::new(),
            details: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl ServicePage {
    /// Benefit text of a service for one HMO and tier, if the table lists it.
    pub fn benefit(&self, hmo: &str, tier: &str, service: &str) -> Option<&str> {
        self.services_details
            .get(hmo)?
            .get(tier)?
            .get(service)
            .map(String::as_str)
    }
}
