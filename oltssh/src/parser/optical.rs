//! `display ont optical-info P O`: transceiver readings of one ONT.

use serde::{Deserialize, Serialize};

use super::{check_failure, scan_labels};
use crate::error::ParseError;

const ONU_NNI_PORT_ID: &str = "ONU NNI port ID";
const MODULE_TYPE: &str = "Module type";
const MODULE_SUB_TYPE: &str = "Module sub-type";
const USED_TYPE: &str = "Used type";
const ENCAPSULATION_TYPE: &str = "Encapsulation Type";
const POWER_PRECISION: &str = "Optical power precision(dBm)";
const VENDOR_NAME: &str = "Vendor name";
const VENDOR_REV: &str = "Vendor rev";
const VENDOR_PN: &str = "Vendor PN";
const VENDOR_SN: &str = "Vendor SN";
const DATE_CODE: &str = "Date Code";
const RX_POWER: &str = "Rx optical power(dBm)";
const RX_POWER_WARNING: &str = "Rx power current warning threshold(dBm)";
const RX_POWER_ALARM: &str = "Rx power current alarm threshold(dBm)";
const TX_POWER: &str = "Tx optical power(dBm)";
const TX_POWER_WARNING: &str = "Tx power current warning threshold(dBm)";
const TX_POWER_ALARM: &str = "Tx power current alarm threshold(dBm)";
const BIAS_CURRENT: &str = "Laser bias current(mA)";
const BIAS_WARNING: &str = "Tx bias current warning threshold(mA)";
const BIAS_ALARM: &str = "Tx bias current alarm threshold(mA)";
const TEMPERATURE: &str = "Temperature(C)";
const TEMPERATURE_WARNING: &str = "Temperature warning threshold(C)";
const TEMPERATURE_ALARM: &str = "Temperature alarm threshold(C)";
const VOLTAGE: &str = "Voltage(V)";
const VOLTAGE_WARNING: &str = "Supply voltage warning threshold(V)";
const VOLTAGE_ALARM: &str = "Supply voltage alarm threshold(V)";
const OLT_RX_POWER: &str = "OLT Rx ONT optical power(dBm)";
const CATV_RX_POWER: &str = "CATV Rx optical power(dBm)";
const CATV_RX_ALARM: &str = "CATV Rx power alarm threshold(dBm)";

const LABELS: &[&str] = &[
    ONU_NNI_PORT_ID,
    MODULE_TYPE,
    MODULE_SUB_TYPE,
    USED_TYPE,
    ENCAPSULATION_TYPE,
    POWER_PRECISION,
    VENDOR_NAME,
    VENDOR_REV,
    VENDOR_PN,
    VENDOR_SN,
    DATE_CODE,
    RX_POWER,
    RX_POWER_WARNING,
    RX_POWER_ALARM,
    TX_POWER,
    TX_POWER_WARNING,
    TX_POWER_ALARM,
    BIAS_CURRENT,
    BIAS_WARNING,
    BIAS_ALARM,
    TEMPERATURE,
    TEMPERATURE_WARNING,
    TEMPERATURE_ALARM,
    VOLTAGE,
    VOLTAGE_WARNING,
    VOLTAGE_ALARM,
    OLT_RX_POWER,
    CATV_RX_POWER,
    CATV_RX_ALARM,
];

/// Optical diagnostics of an ONT at the moment they were read.
///
/// Readings are kept as the device printed them. The live measurements are
/// always present; module details and thresholds depend on the ONT model
/// and firmware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpticalInfo {
    pub onu_nni_port_id: Option<String>,
    pub module_type: Option<String>,
    pub module_sub_type: Option<String>,
    pub used_type: Option<String>,
    pub encapsulation_type: Option<String>,
    pub optical_power_precision: Option<String>,
    pub vendor_name: Option<String>,
    pub vendor_rev: Option<String>,
    pub vendor_pn: Option<String>,
    pub vendor_sn: Option<String>,
    pub date_code: Option<String>,
    pub rx_optical_power: String,
    pub rx_power_warning_threshold: Option<String>,
    pub rx_power_alarm_threshold: Option<String>,
    pub tx_optical_power: String,
    pub tx_power_warning_threshold: Option<String>,
    pub tx_power_alarm_threshold: Option<String>,
    pub laser_bias_current: String,
    pub bias_current_warning_threshold: Option<String>,
    pub bias_current_alarm_threshold: Option<String>,
    pub temperature: String,
    pub temperature_warning_threshold: Option<String>,
    pub temperature_alarm_threshold: Option<String>,
    pub voltage: String,
    pub voltage_warning_threshold: Option<String>,
    pub voltage_alarm_threshold: Option<String>,
    pub olt_rx_ont_optical_power: String,
    pub catv_rx_optical_power: Option<String>,
    pub catv_rx_power_alarm_threshold: Option<String>,
}

/// Parse a numeric reading; `-` and other placeholders give `None`.
fn reading(value: &str) -> Option<f64> {
    value.trim().parse().ok()
}

impl OpticalInfo {
    /// Power received by the ONT in dBm.
    pub fn rx_power_dbm(&self) -> Option<f64> {
        reading(&self.rx_optical_power)
    }

    /// Power sent by the ONT in dBm.
    pub fn tx_power_dbm(&self) -> Option<f64> {
        reading(&self.tx_optical_power)
    }

    /// Power of this ONT as received by the OLT, in dBm.
    pub fn olt_rx_power_dbm(&self) -> Option<f64> {
        reading(&self.olt_rx_ont_optical_power)
    }

    pub fn bias_current_ma(&self) -> Option<f64> {
        reading(&self.laser_bias_current)
    }

    pub fn temperature_c(&self) -> Option<f64> {
        reading(&self.temperature)
    }

    pub fn voltage_v(&self) -> Option<f64> {
        reading(&self.voltage)
    }
}

/// Parse the optical-info report.
pub fn parse_optical_info(text: &str) -> Result<OpticalInfo, ParseError> {
    check_failure(text)?;

    let f = scan_labels(text, LABELS, &[]);

    Ok(OpticalInfo {
        onu_nni_port_id: f.optional(ONU_NNI_PORT_ID),
        module_type: f.optional(MODULE_TYPE),
        module_sub_type: f.optional(MODULE_SUB_TYPE),
        used_type: f.optional(USED_TYPE),
        encapsulation_type: f.optional(ENCAPSULATION_TYPE),
        optical_power_precision: f.optional(POWER_PRECISION),
        vendor_name: f.optional(VENDOR_NAME),
        vendor_rev: f.optional(VENDOR_REV),
        vendor_pn: f.optional(VENDOR_PN),
        vendor_sn: f.optional(VENDOR_SN),
        date_code: f.optional(DATE_CODE),
        rx_optical_power: f.required(RX_POWER)?,
        rx_power_warning_threshold: f.optional(RX_POWER_WARNING),
        rx_power_alarm_threshold: f.optional(RX_POWER_ALARM),
        tx_optical_power: f.required(TX_POWER)?,
        tx_power_warning_threshold: f.optional(TX_POWER_WARNING),
        tx_power_alarm_threshold: f.optional(TX_POWER_ALARM),
        laser_bias_current: f.required(BIAS_CURRENT)?,
        bias_current_warning_threshold: f.optional(BIAS_WARNING),
        bias_current_alarm_threshold: f.optional(BIAS_ALARM),
        temperature: f.required(TEMPERATURE)?,
        temperature_warning_threshold: f.optional(TEMPERATURE_WARNING),
        temperature_alarm_threshold: f.optional(TEMPERATURE_ALARM),
        voltage: f.required(VOLTAGE)?,
        voltage_warning_threshold: f.optional(VOLTAGE_WARNING),
        voltage_alarm_threshold: f.optional(VOLTAGE_ALARM),
        olt_rx_ont_optical_power: f.required(OLT_RX_POWER)?,
        catv_rx_optical_power: f.optional(CATV_RX_POWER),
        catv_rx_power_alarm_threshold: f.optional(CATV_RX_ALARM),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "display ont optical-info 3 5\r
  -----------------------------------------------------------------------------\r
  ONU NNI port ID                        : 0\r
  Module type                            : GPON\r
  Module sub-type                        : CLASS B+\r
  Used type                              : ONU\r
  Encapsulation Type                     : BOSA ON BOARD\r
  Optical power precision(dBm)           : 3.0\r
  Vendor name                            : HUAWEI\r
  Vendor rev                             : -\r
  Vendor PN                              : HW-BOB-0006\r
  Vendor SN                              : 1901C3A1B2C3\r
  Date Code                              : 19-01-16\r
  Rx optical power(dBm)                  : -19.17\r
  Rx power current warning threshold(dBm): [-,-]\r
  Rx power current alarm threshold(dBm)  : [-29.0,-7.0]\r
  Tx optical power(dBm)                  : 2.11\r
  Tx power current warning threshold(dBm): [-,-]\r
  Tx power current alarm threshold(dBm)  : [0.0,5.0]\r
  Laser bias current(mA)                 : 9\r
  Tx bias current warning threshold(mA)  : [-,-]\r
  Tx bias current alarm threshold(mA)    : [0.000,90.000]\r
  Temperature(C)                         : 45\r
  Temperature warning threshold(C)       : [-,-]\r
  Temperature alarm threshold(C)         : [-20,85]\r
  Voltage(V)                             : 3.280\r
  Supply voltage warning threshold(V)    : [-,-]\r
  Supply voltage alarm threshold(V)      : [3.000,3.600]\r
  OLT Rx ONT optical power(dBm)          : -21.94, out of range[-30.00, -8.00]\r
  CATV Rx optical power(dBm)             : -\r
  CATV Rx power alarm threshold(dBm)     : [-,-]\r
  -----------------------------------------------------------------------------\r
\r
MA5683T(config-if-gpon-0/1)#";

    #[test]
    fn test_parse_full_report() {
        let info = parse_optical_info(REPORT).unwrap();
        assert_eq!(info.module_type.as_deref(), Some("GPON"));
        assert_eq!(info.module_sub_type.as_deref(), Some("CLASS B+"));
        assert_eq!(info.vendor_name.as_deref(), Some("HUAWEI"));
        assert_eq!(info.rx_optical_power, "-19.17");
        assert_eq!(info.rx_power_alarm_threshold.as_deref(), Some("[-29.0,-7.0]"));
        assert_eq!(info.temperature, "45");
        assert_eq!(info.voltage, "3.280");
        assert_eq!(info.catv_rx_optical_power.as_deref(), Some("-"));

        assert_eq!(info.rx_power_dbm(), Some(-19.17));
        assert_eq!(info.tx_power_dbm(), Some(2.11));
        assert_eq!(info.bias_current_ma(), Some(9.0));
        assert_eq!(info.temperature_c(), Some(45.0));
        assert_eq!(info.voltage_v(), Some(3.28));
        // Annotated reading does not parse as a plain number
        assert_eq!(info.olt_rx_power_dbm(), None);
    }

    #[test]
    fn test_field_order_does_not_matter() {
        let mut lines: Vec<&str> = REPORT.lines().collect();
        lines.swap(12, 16);
        lines.remove(8);
        let info = parse_optical_info(&lines.join("\n")).unwrap();
        assert_eq!(info.rx_optical_power, "-19.17");
        assert_eq!(info.tx_optical_power, "2.11");
        assert_eq!(info.vendor_name, None);
    }

    #[test]
    fn test_offline_ont_is_rejected() {
        let text = "display ont optical-info 3 5\r\n  Failure: The ONT is not online\r\n\r\nMA5683T(config-if-gpon-0/1)#";
        assert_eq!(
            parse_optical_info(text),
            Err(ParseError::Rejected {
                message: "The ONT is not online".into()
            })
        );
    }

    #[test]
    fn test_missing_measurement_is_an_error() {
        let text = REPORT.replace("Voltage(V)", "Volts");
        assert_eq!(
            parse_optical_info(&text),
            Err(ParseError::MissingField { field: VOLTAGE })
        );
    }

    #[test]
    fn test_serializes() {
        let info = parse_optical_info(REPORT).unwrap();
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["tx_optical_power"], "2.11");
        assert!(json["rx_power_warning_threshold"].is_string());
    }
}
