//! The API client wrapper

use std::time::Duration;

use reqwest::{header, Client, RequestBuilder, Response, StatusCode};
use serde_json::json;
use trapline_core::{
    CapturedRequest, NetworkProtocol, NewRule, NewRuleComponent, Rule, RuleComponent, Zone,
};
use uuid::Uuid;

use crate::ClientError;

/// Upper bound on a single captured-requests page; larger asks are
/// clamped before they hit the API.
const MAX_REQUESTS_PAGE: usize = 1024;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the rule-management API.
///
/// Holds an already-acquired bearer token; acquiring one is the identity
/// provider's business, not ours.
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        Ok(request
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token))
            .header(header::ACCEPT, "application/json")
            .send()
            .await?)
    }

    fn expect_success(response: Response, context: &str) -> Result<Response, ClientError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(ClientError::UnexpectedStatus {
                status: response.status(),
                context: context.to_string(),
            })
        }
    }

    // ==================== Zones ====================

    /// `GET /zones`: all zones the caller has any permission on.
    pub async fn get_zones(&self) -> Result<Vec<Zone>, ClientError> {
        tracing::debug!("get_zones");
        let response = self.send(self.http.get(self.url("zones"))).await?;
        Ok(Self::expect_success(response, "get_zones")?.json().await?)
    }

    /// `GET /zones/{fqdn}`: whether the zone exists at all. A 403 means
    /// it exists but belongs to someone else.
    pub async fn zone_exists(&self, fqdn: &str) -> Result<bool, ClientError> {
        tracing::debug!(fqdn, "zone_exists");
        let response = self
            .send(self.http.get(self.url(&format!("zones/{fqdn}"))))
            .await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            StatusCode::FORBIDDEN => Ok(true),
            status if status.is_success() => Ok(true),
            status => Err(ClientError::UnexpectedStatus {
                status,
                context: format!("zone_exists({fqdn})"),
            }),
        }
    }

    /// `POST /zones`: request `num` new zones, optionally under a
    /// preferred name/domain. Returns false when the server has no free
    /// subdomains to hand out.
    pub async fn add_zone(&self, zone: &str, domain: &str, num: u32) -> Result<bool, ClientError> {
        tracing::debug!(zone, domain, num, "add_zone");
        let payload = json!({ "zone": zone, "domain": domain, "num": num });
        let response = self
            .send(self.http.post(self.url("zones")).json(&payload))
            .await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            status => Err(ClientError::UnexpectedStatus {
                status,
                context: format!("add_zone({zone})"),
            }),
        }
    }

    /// `DELETE /zones/{fqdn}`: owner permission required.
    pub async fn delete_zone(&self, fqdn: &str) -> Result<(), ClientError> {
        tracing::debug!(fqdn, "delete_zone");
        let response = self
            .send(self.http.delete(self.url(&format!("zones/{fqdn}"))))
            .await?;
        Self::expect_success(response, &format!("delete_zone({fqdn})"))?;
        Ok(())
    }

    /// `GET /domains`: parent domains available for new zones.
    pub async fn get_domains(&self) -> Result<Vec<String>, ClientError> {
        tracing::debug!("get_domains");
        let response = self.send(self.http.get(self.url("domains"))).await?;
        Ok(Self::expect_success(response, "get_domains")?.json().await?)
    }

    /// `GET /ping`: liveness probe.
    pub async fn ping(&self) -> Result<(), ClientError> {
        tracing::debug!("ping");
        let response = self.send(self.http.get(self.url("ping"))).await?;
        Self::expect_success(response, "ping")?;
        Ok(())
    }

    // ==================== Rules ====================

    /// `GET /rules/{zone}`: all rules on a zone.
    pub async fn get_rules(&self, zone: &str) -> Result<Vec<Rule>, ClientError> {
        tracing::debug!(zone, "get_rules");
        let response = self
            .send(self.http.get(self.url(&format!("rules/{zone}"))))
            .await?;
        Ok(Self::expect_success(response, &format!("get_rules({zone})"))?
            .json()
            .await?)
    }

    /// `GET /rules/{zone}/{ruleid}`: one rule with its components.
    pub async fn get_rule(&self, zone: &str, rule_id: Uuid) -> Result<Rule, ClientError> {
        tracing::debug!(zone, %rule_id, "get_rule");
        let response = self
            .send(self.http.get(self.url(&format!("rules/{zone}/{rule_id}"))))
            .await?;
        Ok(
            Self::expect_success(response, &format!("get_rule({zone}, {rule_id})"))?
                .json()
                .await?,
        )
    }

    /// `POST /rules`: create a rule; components are added separately. An
    /// empty name defaults to "<protocol> <zone>".
    pub async fn add_rule(
        &self,
        zone: &str,
        protocol: NetworkProtocol,
        priority: u32,
        name: &str,
    ) -> Result<Rule, ClientError> {
        tracing::debug!(zone, %protocol, priority, name, "add_rule");
        let name = if name.is_empty() {
            format!("{protocol} {zone}")
        } else {
            name.to_string()
        };
        let payload = json!({
            "zone": zone,
            "priority": priority,
            "networkprotocol": protocol,
            "name": name,
        });
        let response = self
            .send(self.http.post(self.url("rules")).json(&payload))
            .await?;
        Ok(
            Self::expect_success(response, &format!("add_rule({zone}, {name})"))?
                .json()
                .await?,
        )
    }

    /// `PUT /rules/{zone}/{ruleid}`: priority is the only mutable field.
    pub async fn update_rule_priority(
        &self,
        rule: &Rule,
        priority: u32,
    ) -> Result<(), ClientError> {
        tracing::debug!(zone = %rule.zone, rule_id = %rule.rule_id, priority, "update_rule_priority");
        let response = self
            .send(
                self.http
                    .put(self.url(&format!("rules/{}/{}", rule.zone, rule.rule_id)))
                    .json(&json!({ "priority": priority })),
            )
            .await?;
        Self::expect_success(
            response,
            &format!("update_rule_priority({}, {})", rule.zone, rule.rule_id),
        )?;
        Ok(())
    }

    /// `DELETE /rules/{zone}/{ruleid}`: removes the rule and its
    /// components.
    pub async fn delete_rule(&self, rule: &Rule) -> Result<(), ClientError> {
        tracing::debug!(zone = %rule.zone, rule_id = %rule.rule_id, "delete_rule");
        let response = self
            .send(
                self.http
                    .delete(self.url(&format!("rules/{}/{}", rule.zone, rule.rule_id))),
            )
            .await?;
        Self::expect_success(
            response,
            &format!("delete_rule({}, {})", rule.zone, rule.rule_id),
        )?;
        Ok(())
    }

    // ==================== Rule components ====================

    /// `POST /rules/{zone}/{ruleid}/components`
    pub async fn add_rule_component(
        &self,
        rule: &Rule,
        component: &NewRuleComponent,
    ) -> Result<RuleComponent, ClientError> {
        tracing::debug!(
            zone = %rule.zone,
            rule_id = %rule.rule_id,
            action = %component.action_name,
            "add_rule_component"
        );
        let response = self
            .send(
                self.http
                    .post(
                        self.url(&format!("rules/{}/{}/components", rule.zone, rule.rule_id)),
                    )
                    .json(component),
            )
            .await?;
        Ok(Self::expect_success(
            response,
            &format!("add_rule_component({}, {})", rule.zone, component.action_name),
        )?
        .json()
        .await?)
    }

    /// `PUT /rules/{zone}/{ruleid}/components/{componentid}`: only the
    /// action value can change.
    pub async fn edit_rule_component(
        &self,
        rule: &Rule,
        component: &RuleComponent,
        new_value: &str,
    ) -> Result<(), ClientError> {
        tracing::debug!(
            zone = %rule.zone,
            rule_id = %rule.rule_id,
            component_id = %component.component_id,
            "edit_rule_component"
        );
        let response = self
            .send(
                self.http
                    .put(self.url(&format!(
                        "rules/{}/{}/components/{}",
                        rule.zone, rule.rule_id, component.component_id
                    )))
                    .json(&json!({ "actionvalue": new_value })),
            )
            .await?;
        Self::expect_success(
            response,
            &format!("edit_rule_component({})", component.component_id),
        )?;
        Ok(())
    }

    /// `DELETE /rules/{zone}/{ruleid}/components/{componentid}`
    pub async fn delete_rule_component(
        &self,
        rule: &Rule,
        component: &RuleComponent,
    ) -> Result<(), ClientError> {
        tracing::debug!(
            zone = %rule.zone,
            rule_id = %rule.rule_id,
            component_id = %component.component_id,
            "delete_rule_component"
        );
        let response = self
            .send(self.http.delete(self.url(&format!(
                "rules/{}/{}/components/{}",
                rule.zone, rule.rule_id, component.component_id
            ))))
            .await?;
        Self::expect_success(
            response,
            &format!("delete_rule_component({})", component.component_id),
        )?;
        Ok(())
    }

    // ==================== Captured requests ====================

    /// `GET /requests/{zone}`: a page of captured traffic, newest first.
    pub async fn get_requests(
        &self,
        zone: &str,
        limit: usize,
        skip: usize,
        protocols: &str,
    ) -> Result<Vec<CapturedRequest>, ClientError> {
        let limit = if limit > MAX_REQUESTS_PAGE {
            tracing::info!(zone, limit, "clamping request page to {MAX_REQUESTS_PAGE}");
            MAX_REQUESTS_PAGE
        } else {
            limit
        };
        tracing::debug!(zone, limit, skip, protocols, "get_requests");
        let response = self
            .send(self.http.get(self.url(&format!(
                "requests/{zone}?limit={limit}&skip={skip}&protocols={protocols}"
            ))))
            .await?;
        Ok(
            Self::expect_success(response, &format!("get_requests({zone})"))?
                .json()
                .await?,
        )
    }

    // ==================== Template instantiation ====================

    /// Instantiate compiled rule definitions against a zone: one creation
    /// call per definition, then one per component, in order. Fails fast on
    /// the first error; rules created before the failure stay on the zone
    /// for the operator to inspect.
    ///
    /// The returned rules are the creation responses; their component
    /// lists reflect creation time, not the components added afterwards.
    pub async fn apply_rules(
        &self,
        zone: &str,
        definitions: &[NewRule],
    ) -> Result<Vec<Rule>, ClientError> {
        tracing::debug!(zone, count = definitions.len(), "apply_rules");
        let mut created = Vec::with_capacity(definitions.len());
        for definition in definitions {
            let rule = self
                .add_rule(zone, definition.protocol, definition.priority, &definition.name)
                .await?;
            for component in &definition.components {
                self.add_rule_component(&rule, component).await?;
            }
            created.push(rule);
        }
        Ok(created)
    }
}
