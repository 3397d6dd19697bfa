//! ONT lifecycle operations.
//!
//! Registration, deletion and per-ONT diagnostics run inside a line card
//! (`interface gpon F/S`); discovery and lookups across the OLT run in
//! global configuration.

use log::{debug, warn};
use tokio::io::{AsyncRead, AsyncWrite};

use super::interactive::InteractiveBuilder;
use super::session::OltSession;
use crate::error::{DeviceError, Result};
use crate::ont::{OntIdentity, bare_serial};
use crate::parser::{
    self, DUPLICATE_SERIAL, GeneralInfo, GeneralInfoLookup, OntRecord, OpticalInfo,
    REPEATED_CONFIGURATION, UnmanagedOnt,
};
use crate::platform::PrivilegeLevel;
use crate::platform::vendors::huawei::YES_NO_PROMPT;

/// Descriptions with blanks must be quoted or the device takes only the
/// first word.
fn quote_description(description: &str) -> String {
    if description.is_empty() || description.contains(char::is_whitespace) {
        format!("\"{}\"", description)
    } else {
        description.to_string()
    }
}

impl<S> OltSession<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Register an ONT by serial number on `port` of the current line card
    /// and return the ONT index the OLT assigned.
    ///
    /// Only the first token of `serial` is sent, so a serial copied from the
    /// autofind listing (`48575443A1B2C3D4 (HWTC-A1B2C3D4)`) works as is.
    pub async fn add_ont(&mut self, port: u32, serial: &str, description: &str) -> Result<u32> {
        self.require(PrivilegeLevel::InterfaceConfig)?;

        let serial = bare_serial(serial);
        if serial.is_empty() {
            return Err(DeviceError::InvalidSerialNumber {
                serial: serial.to_string(),
            }
            .into());
        }

        let command = format!(
            "ont add {} sn-auth {} omci ont-lineprofile-id {} ont-srvprofile-id {} desc {}",
            port,
            serial,
            self.platform().line_profile_id,
            self.platform().service_profile_id,
            quote_description(description),
        );
        let response = self.execute_here(&command).await?;

        if response.reply().contains(DUPLICATE_SERIAL) {
            warn!("serial {} is already registered", serial);
            return Err(DeviceError::DuplicateSerialNumber {
                serial: serial.to_string(),
            }
            .into());
        }

        let ont_id = response.parse(|text| {
            parser::check_failure(text)?;
            parser::parse_ont_id(text)
        })?;
        debug!("registered {} as ONT {} on port {}", serial, ont_id, port);
        Ok(ont_id)
    }

    /// Delete every ONT on `port` of the current line card.
    ///
    /// The device asks for confirmation first. Nothing in the answer is
    /// checked: deleting from an empty port is not an error.
    pub async fn delete_ont(&mut self, port: u32) -> Result<()> {
        self.require(PrivilegeLevel::InterfaceConfig)?;

        let events = InteractiveBuilder::new()
            .send(format!("ont delete {} all", port))
            .expect(YES_NO_PROMPT)
            .send("y")
            .expect(self.current_prompt())
            .build();
        self.send_interactive(&events).await?;
        Ok(())
    }

    /// Bind the native VLAN of the platform template to an ONT's Ethernet
    /// port.
    pub async fn add_native_vlan(&mut self, port: u32, ont_id: u32) -> Result<()> {
        self.require(PrivilegeLevel::InterfaceConfig)?;

        let template = &self.platform().native_vlan;
        let command = format!(
            "ont port native-vlan {} {} eth {} vlan {} priority {}",
            port, ont_id, template.eth_port, template.vlan, template.priority
        );
        let response = self.execute_here(&command).await?;

        if parser::contains_ignore_case(response.reply(), REPEATED_CONFIGURATION) {
            warn!("native VLAN already configured on {} ONT {}", port, ont_id);
            return Err(DeviceError::ConfigurationConflict { command }.into());
        }

        response.parse(parser::check_failure)
    }

    /// Read the optical diagnostics of an ONT on the current line card.
    pub async fn get_optical_info(&mut self, port: u32, ont_id: u32) -> Result<OpticalInfo> {
        self.require(PrivilegeLevel::InterfaceConfig)?;

        let command = format!("display ont optical-info {} {}", port, ont_id);
        let response = self.execute_here(&command).await?;
        response.parse(parser::parse_optical_info)
    }

    /// Look up a registered ONT by serial number anywhere on the OLT.
    pub async fn get_general_info_by_serial(&mut self, serial: &str) -> Result<GeneralInfo> {
        self.require(PrivilegeLevel::GlobalConfig)?;

        let serial = bare_serial(serial);
        let command = format!("display ont info by-sn {}", serial);
        let response = self.execute_here(&command).await?;

        match response.parse(parser::parse_general_info)? {
            GeneralInfoLookup::Found(info) => Ok(*info),
            GeneralInfoLookup::NotFound => Err(DeviceError::NotFound {
                serial: serial.to_string(),
            }
            .into()),
            GeneralInfoLookup::InvalidSerial => Err(DeviceError::InvalidSerialNumber {
                serial: serial.to_string(),
            }
            .into()),
        }
    }

    /// List ONTs the OLT has discovered but that are not registered.
    pub async fn list_unmanaged_onts(&mut self) -> Result<Vec<UnmanagedOnt>> {
        self.require(PrivilegeLevel::GlobalConfig)?;

        // Extra newline answers the `{ <cr>|... }:` parameter prompt
        let response = self.execute_here("display ont autofind all\n").await?;
        let onts = response.parse(parser::parse_autofind)?;
        debug!("autofind returned {} ONTs", onts.len());
        Ok(onts)
    }

    /// Read the provisioning of one ONT from the running configuration.
    pub async fn get_ont_record(&mut self, frame: u32, slot: u32, port: u32, ont_id: u32) -> Result<OntRecord> {
        self.require(PrivilegeLevel::GlobalConfig)?;

        let identity = OntIdentity::new(frame, slot, port, ont_id);
        let command = format!(
            "display current-configuration ont {} {}",
            identity.fsp(),
            ont_id
        );
        let response = self.execute_here(&command).await?;

        if let Some(line) = response
            .reply()
            .lines()
            .find(|line| line.contains("Failure") || line.contains("Error"))
        {
            warn!("configuration query for {} failed", identity);
            return Err(DeviceError::Query {
                command,
                message: line.trim().to_string(),
            }
            .into());
        }

        Ok(parser::parse_current_config(identity, response.reply()))
    }
}
