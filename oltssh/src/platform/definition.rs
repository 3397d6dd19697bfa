//! Platform definition for an OLT model.

use serde::{Deserialize, Serialize};

use super::privilege_level::{LineCard, PrivilegeLevel};

/// Parameters of `ont port native-vlan`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeVlanTemplate {
    /// ONT Ethernet port that receives the native VLAN.
    pub eth_port: u32,
    pub vlan: u32,
    pub priority: u32,
}

/// Fixed parameters of `service-port vlan ... gpon ...`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePortTemplate {
    pub gemport: u32,
    pub user_vlan: u32,
    pub inbound_traffic_table: u32,
    pub outbound_traffic_table: u32,
}

/// Platform definition containing everything model-specific about the OLT:
/// the banner its prompts start with and the provisioning profile ids that
/// are baked into the commands the driver sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OltPlatform {
    /// Platform name (e.g. "huawei_ma5683t").
    pub name: String,

    /// Model banner every prompt starts with (e.g. "MA5683T").
    pub hostname: String,

    /// `ont-lineprofile-id` used by `ont add`.
    pub line_profile_id: u32,

    /// `ont-srvprofile-id` used by `ont add`.
    pub service_profile_id: u32,

    pub native_vlan: NativeVlanTemplate,

    pub service_port: ServicePortTemplate,

    /// Terminal width for PTY.
    pub terminal_width: u32,

    /// Terminal height for PTY.
    pub terminal_height: u32,
}

impl OltPlatform {
    /// Create a platform with the given name and prompt banner and the stock
    /// provisioning profile.
    pub fn new(name: impl Into<String>, hostname: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hostname: hostname.into(),
            line_profile_id: 60,
            service_profile_id: 35,
            native_vlan: NativeVlanTemplate {
                eth_port: 1,
                vlan: 20,
                priority: 0,
            },
            service_port: ServicePortTemplate {
                gemport: 20,
                user_vlan: 20,
                inbound_traffic_table: 10,
                outbound_traffic_table: 10,
            },
            terminal_width: 511,
            terminal_height: 24,
        }
    }

    /// Set the ONT line and service profile ids.
    pub fn with_profiles(mut self, line_profile_id: u32, service_profile_id: u32) -> Self {
        self.line_profile_id = line_profile_id;
        self.service_profile_id = service_profile_id;
        self
    }

    /// Set the native VLAN template.
    pub fn with_native_vlan(mut self, template: NativeVlanTemplate) -> Self {
        self.native_vlan = template;
        self
    }

    /// Set the service port template.
    pub fn with_service_port(mut self, template: ServicePortTemplate) -> Self {
        self.service_port = template;
        self
    }

    /// Set terminal dimensions.
    pub fn with_terminal_size(mut self, width: u32, height: u32) -> Self {
        self.terminal_width = width;
        self.terminal_height = height;
        self
    }

    /// Prompt shown at user level, e.g. `MA5683T>`.
    pub fn root_prompt(&self) -> String {
        format!("{}>", self.hostname)
    }

    /// Prompt shown in privileged mode, e.g. `MA5683T#`.
    pub fn privileged_prompt(&self) -> String {
        format!("{}#", self.hostname)
    }

    /// Prompt shown in global configuration, e.g. `MA5683T(config)#`.
    pub fn config_prompt(&self) -> String {
        format!("{}(config)#", self.hostname)
    }

    /// Prompt shown inside a line card, e.g. `MA5683T(config-if-gpon-0/1)#`.
    pub fn interface_prompt(&self, card: LineCard) -> String {
        format!("{}(config-if-gpon-{})#", self.hostname, card)
    }

    /// Prompt for a level; `card` is only consulted for interface config.
    pub fn prompt_for(&self, level: PrivilegeLevel, card: Option<LineCard>) -> String {
        match (level, card) {
            (PrivilegeLevel::Unauthenticated, _) => self.root_prompt(),
            (PrivilegeLevel::Privileged, _) => self.privileged_prompt(),
            (PrivilegeLevel::GlobalConfig, _) => self.config_prompt(),
            (PrivilegeLevel::InterfaceConfig, Some(card)) => self.interface_prompt(card),
            (PrivilegeLevel::InterfaceConfig, None) => format!("{}(config-if-gpon-", self.hostname),
        }
    }
}

impl Default for OltPlatform {
    fn default() -> Self {
        super::vendors::huawei::ma5683t()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_carry_hostname() {
        let platform = OltPlatform::new("lab", "OLT-7");
        assert_eq!(platform.root_prompt(), "OLT-7>");
        assert_eq!(platform.privileged_prompt(), "OLT-7#");
        assert_eq!(platform.config_prompt(), "OLT-7(config)#");
        assert_eq!(
            platform.interface_prompt(LineCard::new(0, 2)),
            "OLT-7(config-if-gpon-0/2)#"
        );
    }

    #[test]
    fn test_builder_overrides() {
        let platform = OltPlatform::new("lab", "OLT-7")
            .with_profiles(10, 11)
            .with_terminal_size(200, 50);
        assert_eq!(platform.line_profile_id, 10);
        assert_eq!(platform.service_profile_id, 11);
        assert_eq!(platform.terminal_width, 200);
        assert_eq!(platform.native_vlan.vlan, 20);
    }
}
