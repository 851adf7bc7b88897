// GWN open API endpoint callers
//
// Each caller sends one signed POST with a fixed request body and returns
// the raw JSON envelope. Use `models::result_list` to extract typed rows.

use serde::Serialize;
use serde_json::Value;

use crate::client::GwnClient;
use crate::error::Error;
use crate::models::NetworkId;

pub const NETWORK_LIST_PATH: &str = "/oapi/v1.0.0/network/list";
pub const AP_LIST_PATH: &str = "/oapi/v1.0.0/ap/list";
pub const CLIENT_LIST_PATH: &str = "/oapi/v1.0.0/client/list";

/// Page size used for AP and client listings.
const LIST_PAGE_SIZE: u32 = 100;

/// Page size used for network listings; only the first network is used.
const NETWORK_PAGE_SIZE: u32 = 5;

// Field order is the serialization order and therefore part of the signed
// body digest.

#[derive(Debug, Serialize)]
struct NetworkListRequest<'a> {
    #[serde(rename = "type")]
    sort: &'a str,
    order: &'a str,
    search: &'a str,
    #[serde(rename = "pageNum")]
    page_num: u32,
    #[serde(rename = "pageSize")]
    page_size: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApListRequest<'a> {
    page_num: u32,
    page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    network_id: Option<&'a NetworkId>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientListRequest<'a> {
    page_num: u32,
    page_size: u32,
    until_now: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    network_id: Option<&'a NetworkId>,
}

impl GwnClient {
    /// First page of networks, ascending by id.
    pub async fn list_networks(&self) -> Result<Value, Error> {
        let body = NetworkListRequest {
            sort: "asc",
            order: "id",
            search: "",
            page_num: 1,
            page_size: NETWORK_PAGE_SIZE,
        };
        self.post(NETWORK_LIST_PATH, &body, &[]).await
    }

    /// First page of access points, optionally scoped to one network.
    pub async fn list_access_points(&self, network: Option<&NetworkId>) -> Result<Value, Error> {
        let body = ApListRequest {
            page_num: 1,
            page_size: LIST_PAGE_SIZE,
            network_id: network,
        };
        self.post(AP_LIST_PATH, &body, &[]).await
    }

    /// Clients currently connected (`untilNow = 1`), optionally scoped to
    /// one network.
    pub async fn list_clients(&self, network: Option<&NetworkId>) -> Result<Value, Error> {
        let body = ClientListRequest {
            page_num: 1,
            page_size: LIST_PAGE_SIZE,
            until_now: 1,
            network_id: network,
        };
        self.post(CLIENT_LIST_PATH, &body, &[]).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn network_request_body_field_order() {
        let body = NetworkListRequest {
            sort: "asc",
            order: "id",
            search: "",
            page_num: 1,
            page_size: NETWORK_PAGE_SIZE,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"type":"asc","order":"id","search":"","pageNum":1,"pageSize":5}"#
        );
    }

    #[test]
    fn unscoped_ap_request_omits_network_id() {
        let body = ApListRequest {
            page_num: 1,
            page_size: LIST_PAGE_SIZE,
            network_id: None,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"pageNum":1,"pageSize":100}"#
        );
    }

    #[test]
    fn scoped_client_request_keeps_network_id_type() {
        let id = NetworkId::Numeric(42);
        let body = ClientListRequest {
            page_num: 1,
            page_size: LIST_PAGE_SIZE,
            until_now: 1,
            network_id: Some(&id),
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"pageNum":1,"pageSize":100,"untilNow":1,"networkId":42}"#
        );
    }
}
