use super::{BackendError, InterfaceState, Management};
use crate::config::{DeviceAuth, InterfaceSpec};
use base64::Engine as _;
use serde_json::{json, Value};
use std::time::Duration;

const YANG_JSON: &str = "application/yang-data+json";
const DEFAULT_SCHEME: &str = "https";

#[derive(Clone)]
pub struct RestconfBackend {
    agent: ureq::Agent,
    auth_header: String,
    scheme: String,
    interface: InterfaceSpec,
}

impl RestconfBackend {
    pub fn new(auth: &DeviceAuth, interface: InterfaceSpec, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        let credentials = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:{}", auth.username, auth.password));
        let scheme = std::env::var("NETWARDEN_RESTCONF_SCHEME")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SCHEME.to_string());
        Self {
            agent,
            auth_header: format!("Basic {credentials}"),
            scheme,
            interface,
        }
    }

    fn config_url(&self, target: &str) -> String {
        format!(
            "{}://{target}/restconf/data/ietf-interfaces:interfaces/interface={}",
            self.scheme,
            urlencoding::encode(&self.interface.name)
        )
    }

    fn state_url(&self, target: &str) -> String {
        format!(
            "{}://{target}/restconf/data/ietf-interfaces:interfaces-state/interface={}",
            self.scheme,
            urlencoding::encode(&self.interface.name)
        )
    }

    fn interface_payload(&self, enabled: bool) -> Value {
        json!({
            "ietf-interfaces:interface": {
                "name": self.interface.name,
                "description": self.interface.description,
                "type": "iana-if-type:softwareLoopback",
                "enabled": enabled,
                "ietf-ip:ipv4": {
                    "address": [
                        {
                            "ip": self.interface.ipv4_address,
                            "netmask": self.interface.netmask,
                        }
                    ]
                },
                "ietf-ip:ipv6": {},
            }
        })
    }

    fn request(&self, method: &str, url: &str) -> ureq::Request {
        self.agent
            .request(method, url)
            .set("Authorization", &self.auth_header)
            .set("Accept", YANG_JSON)
            .set("Content-Type", YANG_JSON)
    }

    fn send(
        &self,
        method: &str,
        url: &str,
        body: Option<&Value>,
    ) -> Result<ureq::Response, BackendError> {
        let request = self.request(method, url);
        let result = match body {
            Some(body) => request.send_json(body.clone()),
            None => request.call(),
        };
        result.map_err(|err| match err {
            ureq::Error::Status(status, _) => BackendError::RestconfStatus {
                url: url.to_string(),
                status,
            },
            other => BackendError::RestconfRequest {
                url: url.to_string(),
                reason: other.to_string(),
            },
        })
    }
}

fn interface_object(reply: &Value) -> Option<&Value> {
    let data = reply.get("ietf-interfaces:interface")?;
    // some train releases wrap the keyed entry in a one-element list
    match data {
        Value::Array(entries) => entries.first(),
        other => Some(other),
    }
}

fn status_field(interface: &Value, field: &str) -> String {
    interface
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string()
}

impl Management for RestconfBackend {
    fn exists(&self, target: &str) -> Result<bool, BackendError> {
        let url = self.config_url(target);
        match self.send("GET", &url, None) {
            Ok(_) => Ok(true),
            Err(BackendError::RestconfStatus { status: 404, .. }) => Ok(false),
            Err(err) => Err(err),
        }
    }

    fn create(&self, target: &str) -> Result<(), BackendError> {
        let url = self.config_url(target);
        self.send("PUT", &url, Some(&self.interface_payload(true)))?;
        Ok(())
    }

    fn delete(&self, target: &str) -> Result<(), BackendError> {
        let url = self.config_url(target);
        self.send("DELETE", &url, None)?;
        Ok(())
    }

    fn set_enabled(&self, target: &str, enabled: bool) -> Result<(), BackendError> {
        let url = self.config_url(target);
        let payload = json!({"ietf-interfaces:interface": {"enabled": enabled}});
        self.send("PATCH", &url, Some(&payload))?;
        Ok(())
    }

    fn query_state(&self, target: &str) -> Result<Option<InterfaceState>, BackendError> {
        let url = self.state_url(target);
        let response = match self.send("GET", &url, None) {
            Ok(response) => response,
            Err(BackendError::RestconfStatus { status: 404, .. }) => return Ok(None),
            Err(err) => return Err(err),
        };
        let reply: Value = response
            .into_json()
            .map_err(|err| BackendError::RestconfDecode(err.to_string()))?;
        let Some(interface) = interface_object(&reply) else {
            return Err(BackendError::RestconfDecode(
                "reply carries no ietf-interfaces:interface entry".to_string(),
            ));
        };
        Ok(Some(InterfaceState {
            admin_status: status_field(interface, "admin-status"),
            oper_status: status_field(interface, "oper-status"),
        }))
    }
}
