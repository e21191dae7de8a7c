//! Typed client for the dashboard's backend functions.

use reqwest::Client;
use tracing::debug;

use super::{ClientError, parse_response};
use crate::config::{EndpointName, EndpointTable};
use crate::objects::{
    ApiErrorBody, CreateIntegrationRequest, CreateIntegrationResponse, FetchOfdReceiptsRequest,
    FetchOfdReceiptsResponse, IntegrationsOverview, ListPaymentsQuery, ListReceiptsQuery,
    ListWebhookLogsQuery, PaymentsPage, ReceiptsPage, UpdateIntegrationRequest,
    UpdateIntegrationResponse, WebhookLogsPage,
};

/// Typed HTTP client for the backend.
///
/// Every function has its own URL, looked up in the [`EndpointTable`] the
/// client was built with. Requests are independent; when several are in
/// flight for the same view the caller keeps whichever answer arrives last.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    endpoints: EndpointTable,
}

#[derive(serde::Serialize)]
struct OwnerQuery {
    owner_id: i64,
}

impl BackendClient {
    pub fn new(endpoints: EndpointTable) -> Self {
        Self {
            http: Client::new(),
            endpoints,
        }
    }

    /// Replace the default `reqwest::Client` with a custom one.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    pub fn endpoints(&self) -> &EndpointTable {
        &self.endpoints
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    /// `GET payments-list` – raw payment notifications, newest first.
    pub async fn list_payments(
        &self,
        query: &ListPaymentsQuery,
    ) -> Result<PaymentsPage, ClientError> {
        let url = self.endpoints.get(EndpointName::PaymentsList)?.clone();
        debug!(owner_id = query.owner_id, limit = query.limit, "Fetching payments");

        let resp = self.http.get(url).query(query).send().await?;
        parse_response(resp).await
    }

    /// `GET integrations-list` – provider catalogue and the owner's
    /// integrations.
    pub async fn list_integrations(
        &self,
        owner_id: i64,
    ) -> Result<IntegrationsOverview, ClientError> {
        let url = self.endpoints.get(EndpointName::IntegrationsList)?.clone();
        debug!(owner_id, "Fetching integrations");

        let resp = self
            .http
            .get(url)
            .query(&OwnerQuery { owner_id })
            .send()
            .await?;
        parse_response(resp).await
    }

    /// `POST integrations-create` – register a new integration. The response
    /// carries the webhook URL to configure at the provider.
    pub async fn create_integration(
        &self,
        request: &CreateIntegrationRequest,
    ) -> Result<CreateIntegrationResponse, ClientError> {
        let url = self.endpoints.get(EndpointName::IntegrationsCreate)?.clone();
        debug!(
            owner_id = request.owner_id,
            provider = %request.provider_slug,
            "Creating integration"
        );

        let resp = self.http.post(url).json(request).send().await?;
        parse_response(resp).await
    }

    /// `PUT integrations-update`.
    pub async fn update_integration(
        &self,
        request: &UpdateIntegrationRequest,
    ) -> Result<UpdateIntegrationResponse, ClientError> {
        let url = self.endpoints.get(EndpointName::IntegrationsUpdate)?.clone();
        debug!(integration_id = request.integration_id, "Updating integration");

        let resp = self.http.put(url).json(request).send().await?;
        parse_response(resp).await
    }

    /// `GET receipts-list` – receipts from all sources, newest document
    /// first.
    pub async fn list_receipts(
        &self,
        query: &ListReceiptsQuery,
    ) -> Result<ReceiptsPage, ClientError> {
        let url = self.endpoints.get(EndpointName::ReceiptsList)?.clone();
        debug!(owner_id = query.owner_id, source = ?query.source, "Fetching receipts");

        let resp = self.http.get(url).query(query).send().await?;
        let bytes = success_bytes(resp).await?;
        let page: ReceiptsPage = serde_json::from_slice(&bytes)?;
        if !page.success {
            return Err(rejection(&bytes));
        }
        Ok(page)
    }

    /// `GET webhook-logs` – forwarding attempts, newest first.
    pub async fn list_webhook_logs(
        &self,
        query: &ListWebhookLogsQuery,
    ) -> Result<WebhookLogsPage, ClientError> {
        let url = self.endpoints.get(EndpointName::WebhookLogs)?.clone();
        debug!(
            owner_id = query.owner_id,
            integration_id = ?query.integration_id,
            "Fetching webhook logs"
        );

        let resp = self.http.get(url).query(query).send().await?;
        parse_response(resp).await
    }

    /// `POST ofd-fetch-receipts` – make the backend pull receipts from the
    /// fiscal data operator.
    pub async fn fetch_ofd_receipts(
        &self,
        request: &FetchOfdReceiptsRequest,
    ) -> Result<FetchOfdReceiptsResponse, ClientError> {
        let url = self.endpoints.get(EndpointName::OfdFetchReceipts)?.clone();
        debug!(integration_id = request.integration_id, "Requesting OFD receipt import");

        let resp = self.http.post(url).json(request).send().await?;
        let bytes = success_bytes(resp).await?;
        let result: FetchOfdReceiptsResponse = serde_json::from_slice(&bytes)?;
        if !result.success {
            return Err(rejection(&bytes));
        }
        Ok(result)
    }
}

async fn success_bytes(resp: reqwest::Response) -> Result<bytes::Bytes, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::Api { status, body });
    }
    Ok(resp.bytes().await?)
}

/// Some functions answer 200 with `{"error": true, "message": ...}`.
fn rejection(body: &[u8]) -> ClientError {
    let message = serde_json::from_slice::<ApiErrorBody>(body)
        .ok()
        .and_then(|e| e.describe())
        .unwrap_or_else(|| "backend reported failure".to_owned());
    ClientError::Rejected(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_message() {
        let err = rejection(br#"{"error": true, "message": "not supported"}"#);
        assert!(matches!(err, ClientError::Rejected(m) if m == "not supported"));

        let err = rejection(b"{}");
        assert!(matches!(err, ClientError::Rejected(m) if m == "backend reported failure"));
    }

    #[test]
    fn test_missing_endpoint_is_config_error() {
        let client = BackendClient::new(EndpointTable::new());
        let err = ClientError::from(
            client
                .endpoints()
                .get(EndpointName::PaymentsList)
                .unwrap_err(),
        );
        assert!(matches!(err, ClientError::Config(_)));
    }
}
