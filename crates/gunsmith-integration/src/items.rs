//! Items API client for the weapon and weapon-mod catalog

use reqwest::Client;
use tracing::{debug, warn};

use crate::error::IntegrationError;
use crate::types::*;

pub const DEFAULT_ENDPOINT: &str = "https://api.tarkov.dev/graphql";

/// Guns and mods with the property fragments the build calculator needs
pub const WEAPONS_AND_MODS_QUERY: &str = r#"
query {
  items(types: [gun, mods]) {
    id
    name
    shortName
    types
    properties {
      ... on ItemPropertiesWeapon {
        caliber
        defaultAmmo { id name }
        effectiveDistance
        ergonomics
        fireModes
        fireRate
        recoilVertical
        recoilHorizontal
        slots { ...SlotFields }
      }
      ... on ItemPropertiesWeaponMod {
        ergonomics
        recoilModifier
        slots { ...SlotFields }
      }
    }
  }
}

fragment SlotFields on ItemSlot {
  name
  nameId
  required
  filters {
    allowedItems { id name }
    excludedItems { id name }
  }
}
"#;

/// API client for the provider's `items` query
pub struct ItemsApi {
    client: Client,
    endpoint: String,
}

impl ItemsApi {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Fetch every gun and weapon mod record
    pub async fn fetch_weapons_and_mods(&self) -> Result<Vec<ProviderItem>, IntegrationError> {
        let body = GraphQlRequest {
            query: WEAPONS_AND_MODS_QUERY.to_string(),
        };

        debug!("POST {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(IntegrationError::ServerError { status: status.as_u16(), message: text });
        }

        let body: GraphQlResponse<ItemsData> = response.json().await?;
        into_items(body)
    }
}

/// Unwrap the GraphQL envelope, surfacing the first reported error
pub fn into_items(response: GraphQlResponse<ItemsData>) -> Result<Vec<ProviderItem>, IntegrationError> {
    if let Some(first) = response.errors.first() {
        warn!("Provider returned {} GraphQL error(s)", response.errors.len());
        return Err(IntegrationError::GraphQl(first.message.clone()));
    }
    response
        .data
        .map(|data| data.items)
        .ok_or_else(|| IntegrationError::Serialization("Response has no data".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_items_ok() {
        let json = r#"{"data": {"items": [{"id": "a", "name": "A", "types": ["mods"]}]}}"#;
        let resp: GraphQlResponse<ItemsData> = serde_json::from_str(json).unwrap();
        let items = into_items(resp).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "a");
    }

    #[test]
    fn test_into_items_reports_first_error() {
        let json = r#"{"data": null, "errors": [{"message": "first"}, {"message": "second"}]}"#;
        let resp: GraphQlResponse<ItemsData> = serde_json::from_str(json).unwrap();
        match into_items(resp) {
            Err(IntegrationError::GraphQl(msg)) => assert_eq!(msg, "first"),
            other => panic!("expected GraphQl error, got {:?}", other),
        }
    }

    #[test]
    fn test_into_items_missing_data() {
        let resp: GraphQlResponse<ItemsData> = serde_json::from_str("{}").unwrap();
        assert!(matches!(into_items(resp), Err(IntegrationError::Serialization(_))));
    }

    #[test]
    fn test_query_requests_both_fragments() {
        assert!(WEAPONS_AND_MODS_QUERY.contains("ItemPropertiesWeapon "));
        assert!(WEAPONS_AND_MODS_QUERY.contains("ItemPropertiesWeaponMod"));
        assert!(WEAPONS_AND_MODS_QUERY.contains("recoilModifier"));
    }
}
