//! `display ont info by-sn SN`: registration and run state of one ONT.

use serde::{Deserialize, Serialize};

use super::{ONT_NOT_FOUND, PARAMETER_ERROR, check_failure, scan_labels};
use crate::error::ParseError;
use crate::ont::{FrameSlotPort, OntIdentity};

const FSP: &str = "F/S/P";
const ONT_ID: &str = "ONT-ID";
const CONTROL_FLAG: &str = "Control flag";
const RUN_STATE: &str = "Run state";
const CONFIG_STATE: &str = "Config state";
const MATCH_STATE: &str = "Match state";
const DBA_TYPE: &str = "DBA type";
const DISTANCE: &str = "ONT distance(m)";
const LAST_DISTANCE: &str = "ONT last distance(m)";
const BATTERY_STATE: &str = "ONT battery state";
const MEMORY_OCCUPATION: &str = "Memory occupation";
const CPU_OCCUPATION: &str = "CPU occupation";
const TEMPERATURE: &str = "Temperature";
const AUTHENTIC_TYPE: &str = "Authentic type";
const SN: &str = "SN";
const MANAGEMENT_MODE: &str = "Management mode";
const SOFTWARE_WORK_MODE: &str = "Software work mode";
const ISOLATION_STATE: &str = "Isolation state";
const DESCRIPTION: &str = "Description";
const LAST_DOWN_CAUSE: &str = "Last down cause";
const LAST_UP_TIME: &str = "Last up time";
const LAST_DOWN_TIME: &str = "Last down time";
const LAST_DYING_GASP_TIME: &str = "Last dying gasp time";
const ONLINE_DURATION: &str = "ONT online duration";

const LABELS: &[&str] = &[
    FSP,
    ONT_ID,
    CONTROL_FLAG,
    RUN_STATE,
    CONFIG_STATE,
    MATCH_STATE,
    DBA_TYPE,
    DISTANCE,
    LAST_DISTANCE,
    BATTERY_STATE,
    MEMORY_OCCUPATION,
    CPU_OCCUPATION,
    TEMPERATURE,
    AUTHENTIC_TYPE,
    SN,
    MANAGEMENT_MODE,
    SOFTWARE_WORK_MODE,
    ISOLATION_STATE,
    DESCRIPTION,
    LAST_DOWN_CAUSE,
    LAST_UP_TIME,
    LAST_DOWN_TIME,
    LAST_DYING_GASP_TIME,
    ONLINE_DURATION,
];

/// General information of a registered ONT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralInfo {
    pub fsp: FrameSlotPort,
    pub ont_id: u32,
    pub control_flag: String,
    pub run_state: String,
    pub config_state: String,
    pub match_state: String,
    pub serial_number: String,
    pub dba_type: Option<String>,
    pub distance: Option<String>,
    pub last_distance: Option<String>,
    pub battery_state: Option<String>,
    pub memory_occupation: Option<String>,
    pub cpu_occupation: Option<String>,
    pub temperature: Option<String>,
    pub authentic_type: Option<String>,
    pub management_mode: Option<String>,
    pub software_work_mode: Option<String>,
    pub isolation_state: Option<String>,
    /// Wrapped descriptions are joined back together.
    pub description: Option<String>,
    pub last_down_cause: Option<String>,
    pub last_up_time: Option<String>,
    pub last_down_time: Option<String>,
    pub last_dying_gasp_time: Option<String>,
    pub online_duration: Option<String>,
}

impl GeneralInfo {
    /// Address the ONT is registered under.
    pub fn identity(&self) -> OntIdentity {
        OntIdentity::from_fsp(self.fsp, self.ont_id)
    }

    pub fn is_online(&self) -> bool {
        self.run_state == "online"
    }
}

/// What a by-serial lookup found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneralInfoLookup {
    Found(Box<GeneralInfo>),
    NotFound,
    InvalidSerial,
}

/// Parse the by-serial report.
///
/// The "not found" and "parameter error" answers are ordinary outcomes of a
/// lookup and are returned as such; any other `Failure:` line is an error.
pub fn parse_general_info(text: &str) -> Result<GeneralInfoLookup, ParseError> {
    for line in text.lines() {
        let line = line.trim();
        if line == ONT_NOT_FOUND {
            return Ok(GeneralInfoLookup::NotFound);
        }
        if line.contains(PARAMETER_ERROR) {
            return Ok(GeneralInfoLookup::InvalidSerial);
        }
    }
    check_failure(text)?;

    let f = scan_labels(text, LABELS, &[DESCRIPTION]);

    let info = GeneralInfo {
        fsp: f.required(FSP)?.parse()?,
        ont_id: f.required_number(ONT_ID)?,
        control_flag: f.required(CONTROL_FLAG)?,
        run_state: f.required(RUN_STATE)?,
        config_state: f.required(CONFIG_STATE)?,
        match_state: f.required(MATCH_STATE)?,
        serial_number: f.required(SN)?,
        dba_type: f.optional(DBA_TYPE),
        distance: f.optional(DISTANCE),
        last_distance: f.optional(LAST_DISTANCE),
        battery_state: f.optional(BATTERY_STATE),
        memory_occupation: f.optional(MEMORY_OCCUPATION),
        cpu_occupation: f.optional(CPU_OCCUPATION),
        temperature: f.optional(TEMPERATURE),
        authentic_type: f.optional(AUTHENTIC_TYPE),
        management_mode: f.optional(MANAGEMENT_MODE),
        software_work_mode: f.optional(SOFTWARE_WORK_MODE),
        isolation_state: f.optional(ISOLATION_STATE),
        description: f.optional(DESCRIPTION),
        last_down_cause: f.optional(LAST_DOWN_CAUSE),
        last_up_time: f.optional(LAST_UP_TIME),
        last_down_time: f.optional(LAST_DOWN_TIME),
        last_dying_gasp_time: f.optional(LAST_DYING_GASP_TIME),
        online_duration: f.optional(ONLINE_DURATION),
    };

    Ok(GeneralInfoLookup::Found(Box::new(info)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "display ont info by-sn 48575443A1B2C3D4\r
  -----------------------------------------------------------------------------\r
  F/S/P                   : 0/1/3\r
  ONT-ID                  : 5\r
  Control flag            : active\r
  Run state               : online\r
  Config state            : normal\r
  Match state             : match\r
  DBA type                : SR\r
  ONT distance(m)         : 1874\r
  ONT last distance(m)    : 1874\r
  ONT battery state       : not support\r
  Memory occupation       : 46%\r
  CPU occupation          : 1%\r
  Temperature             : 47(C)\r
  Authentic type          : SN-auth\r
  SN                      : 48575443A1B2C3D4 (HWTC-A1B2C3D4)\r
  Management mode         : OMCI\r
  Software work mode      : normal\r
  Isolation state         : normal\r
  ONT IP 0 address/mask   : -\r
  Description             : client-42 building 7 apartment 1\r
                            2B rear entrance\r
  Last down cause         : dying-gasp\r
  Last up time            : 2024-05-01 09:58:12+08:00\r
  Last down time          : 2024-05-01 09:51:40+08:00\r
  Last dying gasp time    : 2024-05-01 09:51:40+08:00\r
  ONT online duration     : 0 day(s), 0 hour(s), 2 minute(s), 3 second(s)\r
  Type C support          : Not support\r
  -----------------------------------------------------------------------------\r
\r
MA5683T(config)#";

    fn found(text: &str) -> GeneralInfo {
        match parse_general_info(text).unwrap() {
            GeneralInfoLookup::Found(info) => *info,
            other => panic!("unexpected lookup result: {other:?}"),
        }
    }

    #[test]
    fn test_parse_full_report() {
        let info = found(REPORT);
        assert_eq!(info.identity(), OntIdentity::new(0, 1, 3, 5));
        assert_eq!(info.control_flag, "active");
        assert!(info.is_online());
        assert_eq!(info.serial_number, "48575443A1B2C3D4 (HWTC-A1B2C3D4)");
        assert_eq!(info.temperature.as_deref(), Some("47(C)"));
        assert_eq!(info.last_down_cause.as_deref(), Some("dying-gasp"));
        assert_eq!(
            info.online_duration.as_deref(),
            Some("0 day(s), 0 hour(s), 2 minute(s), 3 second(s)")
        );
    }

    #[test]
    fn test_wrapped_description_is_joined() {
        let info = found(REPORT);
        assert_eq!(
            info.description.as_deref(),
            Some("client-42 building 7 apartment 12B rear entrance")
        );
    }

    #[test]
    fn test_not_found() {
        let text = "display ont info by-sn ABCD1234\r\nThe required ONT does not exist\r\n\r\nMA5683T(config)#";
        assert_eq!(parse_general_info(text), Ok(GeneralInfoLookup::NotFound));
    }

    #[test]
    fn test_parameter_error() {
        let text = "display ont info by-sn XYZ\r\n                      ^\r\n  % Parameter error, the error locates at '^'\r\n\r\nMA5683T(config)#";
        assert_eq!(parse_general_info(text), Ok(GeneralInfoLookup::InvalidSerial));
    }

    #[test]
    fn test_missing_required_field() {
        let text = REPORT.replace("Run state", "Running state");
        assert_eq!(
            parse_general_info(&text),
            Err(ParseError::MissingField { field: RUN_STATE })
        );
    }

    #[test]
    fn test_bad_address() {
        let text = REPORT.replace("0/1/3", "0/1");
        assert_eq!(
            parse_general_info(&text),
            Err(ParseError::InvalidAddress("0/1".into()))
        );
    }

    #[test]
    fn test_serializes() {
        let json = serde_json::to_value(found(REPORT)).unwrap();
        assert_eq!(json["ont_id"], 5);
        assert_eq!(json["fsp"]["port"], 3);
        assert_eq!(json["match_state"], "match");
    }
}
