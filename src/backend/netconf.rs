use super::ssh::SshRunner;
use super::{BackendError, InterfaceState, Management};
use crate::config::{DeviceAuth, InterfaceSpec};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::time::Duration;

const NETCONF_PORT: u16 = 830;
const DELIMITER: &str = "]]>]]>";
const BASE_NS: &str = "urn:ietf:params:xml:ns:netconf:base:1.0";
const IF_NS: &str = "urn:ietf:params:xml:ns:yang:ietf-interfaces";
const IP_NS: &str = "urn:ietf:params:xml:ns:yang:ietf-ip";

#[derive(Debug, Clone)]
pub struct NetconfBackend {
    runner: SshRunner,
    interface: InterfaceSpec,
}

impl NetconfBackend {
    pub fn new(auth: &DeviceAuth, interface: InterfaceSpec, timeout: Duration) -> Self {
        Self {
            runner: SshRunner::new(&auth.username, timeout),
            interface,
        }
    }

    fn hello() -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
             <hello xmlns=\"{BASE_NS}\">\n\
               <capabilities>\n\
                 <capability>urn:ietf:params:netconf:base:1.0</capability>\n\
               </capabilities>\n\
             </hello>"
        )
    }

    fn rpc(&self, target: &str, body: &str) -> Result<String, BackendError> {
        let payload = format!(
            "{hello}\n{DELIMITER}\n\
             <rpc message-id=\"101\" xmlns=\"{BASE_NS}\">{body}</rpc>\n{DELIMITER}\n\
             <rpc message-id=\"102\" xmlns=\"{BASE_NS}\"><close-session/></rpc>\n{DELIMITER}\n",
            hello = Self::hello(),
        );
        let stdout = self
            .runner
            .run_subsystem(target, NETCONF_PORT, "netconf", &payload)
            .map_err(|err| BackendError::NetconfSession {
                target: target.to_string(),
                reason: err.to_string(),
            })?;
        stdout
            .split(DELIMITER)
            .find(|chunk| chunk.contains("message-id=\"101\""))
            .map(|chunk| chunk.trim().to_string())
            .ok_or_else(|| BackendError::NetconfSession {
                target: target.to_string(),
                reason: "no rpc-reply for message-id 101 in session output".to_string(),
            })
    }

    fn edit_config(&self, target: &str, config: &str) -> Result<(), BackendError> {
        let body = format!(
            "<edit-config><target><running/></target><config>{config}</config></edit-config>"
        );
        let reply = self.rpc(target, &body)?;
        if has_element(&reply, "ok") {
            return Ok(());
        }
        Err(BackendError::NetconfRejected {
            reply: compact_xml(&reply),
        })
    }

    fn loopback_config(&self, enabled: bool) -> String {
        format!(
            "<interfaces xmlns=\"{IF_NS}\">\
               <interface>\
                 <name>{name}</name>\
                 <description>{description}</description>\
                 <type xmlns:ianaift=\"urn:ietf:params:xml:ns:yang:iana-if-type\">ianaift:softwareLoopback</type>\
                 <enabled>{enabled}</enabled>\
                 <ipv4 xmlns=\"{IP_NS}\">\
                   <address><ip>{ip}</ip><netmask>{netmask}</netmask></address>\
                 </ipv4>\
               </interface>\
             </interfaces>",
            name = self.interface.name,
            description = self.interface.description,
            ip = self.interface.ipv4_address,
            netmask = self.interface.netmask,
        )
    }

    fn enabled_config(&self, enabled: bool) -> String {
        format!(
            "<interfaces xmlns=\"{IF_NS}\">\
               <interface>\
                 <name>{name}</name>\
                 <enabled>{enabled}</enabled>\
               </interface>\
             </interfaces>",
            name = self.interface.name,
        )
    }

    fn delete_config(&self) -> String {
        format!(
            "<interfaces xmlns=\"{IF_NS}\">\
               <interface xmlns:nc=\"{BASE_NS}\" nc:operation=\"delete\">\
                 <name>{name}</name>\
               </interface>\
             </interfaces>",
            name = self.interface.name,
        )
    }

    fn name_filter(&self, store: &str) -> String {
        format!(
            "<filter><{store} xmlns=\"{IF_NS}\">\
               <interface><name>{name}</name></interface>\
             </{store}></filter>",
            name = self.interface.name,
        )
    }
}

impl Management for NetconfBackend {
    fn exists(&self, target: &str) -> Result<bool, BackendError> {
        let body = format!(
            "<get-config><source><running/></source>{filter}</get-config>",
            filter = self.name_filter("interfaces"),
        );
        let reply = self.rpc(target, &body)?;
        if has_element(&reply, "rpc-error") {
            return Err(BackendError::NetconfRejected {
                reply: compact_xml(&reply),
            });
        }
        Ok(element_texts(&reply, "name")
            .iter()
            .any(|name| name == &self.interface.name))
    }

    fn create(&self, target: &str) -> Result<(), BackendError> {
        self.edit_config(target, &self.loopback_config(true))
    }

    fn delete(&self, target: &str) -> Result<(), BackendError> {
        let config = self.delete_config();
        self.edit_config(target, &config)
    }

    fn set_enabled(&self, target: &str, enabled: bool) -> Result<(), BackendError> {
        self.edit_config(target, &self.enabled_config(enabled))
    }

    fn query_state(&self, target: &str) -> Result<Option<InterfaceState>, BackendError> {
        let body = format!(
            "<get>{filter}</get>",
            filter = self.name_filter("interfaces-state"),
        );
        let reply = self.rpc(target, &body)?;
        if has_element(&reply, "rpc-error") {
            return Err(BackendError::NetconfRejected {
                reply: compact_xml(&reply),
            });
        }
        let found = element_texts(&reply, "name")
            .iter()
            .any(|name| name == &self.interface.name);
        if !found {
            return Ok(None);
        }
        Ok(Some(InterfaceState {
            admin_status: element_text(&reply, "admin-status")
                .unwrap_or_else(|| "unknown".to_string()),
            oper_status: element_text(&reply, "oper-status")
                .unwrap_or_else(|| "unknown".to_string()),
        }))
    }
}

fn compact_xml(xml: &str) -> String {
    xml.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn has_element(xml: &str, element: &str) -> bool {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == element.as_bytes() {
                    return true;
                }
            }
            Ok(Event::Eof) | Err(_) => return false,
            _ => {}
        }
    }
}

fn element_text(xml: &str, element: &str) -> Option<String> {
    element_texts(xml, element).into_iter().next()
}

fn element_texts(xml: &str, element: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    let mut inside = false;
    let mut found = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => inside = e.local_name().as_ref() == element.as_bytes(),
            Ok(Event::End(_)) => inside = false,
            Ok(Event::Text(e)) => {
                if inside {
                    if let Ok(text) = e.unescape() {
                        let text = text.trim();
                        if !text.is_empty() {
                            found.push(text.to_string());
                        }
                    }
                }
            }
            Ok(Event::Eof) | Err(_) => return found,
            _ => {}
        }
    }
}
