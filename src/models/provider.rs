use serde::{Deserialize, Serialize};

/// A supplier tab: one category of providers and their contacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderGroup {
    pub id: String,
    pub title: String,
    pub contacts: Vec<ProviderContact>,
}

/// A single supplier contact row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderContact {
    pub id: String,
    pub company: String,
    pub brand: String,
    pub name: String,
    pub role: String,
    pub email: String,
    pub phone: String,
    #[serde(rename = "isFavorite")]
    pub is_favorite: bool,
    pub buyer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_mkt_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_compras_name: Option<String>,
}
