//! Built-in OLT platform definitions.

pub mod huawei;
