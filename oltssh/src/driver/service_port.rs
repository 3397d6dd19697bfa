//! Service-port operations. Service ports bind a VLAN to an ONT's GEM port
//! and are configured from global configuration, not inside a line card.

use log::warn;
use tokio::io::{AsyncRead, AsyncWrite};

use super::session::OltSession;
use crate::error::{DeviceError, Result};
use crate::ont::FrameSlotPort;
use crate::parser::{self, ServicePort, VLAN_NOT_FOUND};
use crate::platform::PrivilegeLevel;

impl<S> OltSession<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Create a service port carrying `vlan` for an ONT, using the
    /// platform's GEM port and traffic tables.
    pub async fn add_service_port(
        &mut self,
        vlan: u32,
        frame: u32,
        slot: u32,
        port: u32,
        ont_id: u32,
    ) -> Result<()> {
        self.require(PrivilegeLevel::GlobalConfig)?;

        let template = &self.platform().service_port;
        let command = format!(
            "service-port vlan {} gpon {} ont {} gemport {} multi-service user-vlan {} tag-transform translate inbound traffic-table index {} outbound traffic-table index {}",
            vlan,
            FrameSlotPort::new(frame, slot, port),
            ont_id,
            template.gemport,
            template.user_vlan,
            template.inbound_traffic_table,
            template.outbound_traffic_table,
        );
        let response = self.execute_here(&command).await?;

        if response.reply().contains(VLAN_NOT_FOUND) {
            warn!("VLAN {} does not exist on the OLT", vlan);
            return Err(DeviceError::VlanNotFound { vlan }.into());
        }

        response.parse(parser::check_failure)
    }

    /// Remove a service port by index.
    pub async fn undo_service_port(&mut self, index: u32) -> Result<()> {
        self.require(PrivilegeLevel::GlobalConfig)?;

        let response = self
            .execute_here(&format!("undo service-port {}", index))
            .await?;
        response.parse(parser::check_failure)
    }

    /// List the service ports bound to an ONT. An ONT without service
    /// ports gives an empty list.
    pub async fn list_service_ports(
        &mut self,
        frame: u32,
        slot: u32,
        port: u32,
        ont_id: u32,
    ) -> Result<Vec<ServicePort>> {
        self.require(PrivilegeLevel::GlobalConfig)?;

        // Extra newline answers the `{ <cr>|... }:` parameter prompt
        let command = format!(
            "display service-port port {} ont {}\n",
            FrameSlotPort::new(frame, slot, port),
            ont_id
        );
        let response = self.execute_here(&command).await?;
        response.parse(parser::parse_service_ports)
    }
}
