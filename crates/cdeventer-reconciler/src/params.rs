//! Run parameter parsing.

use std::collections::BTreeMap;

use cdeventer_types::{Param, ParamValue};

use crate::error::{ReconcileError, Result};

/// Name of the parameter carrying the CDEvent context.
pub const CONTEXT_PARAM: &str = "context";
/// Name of the parameter carrying the CDEvent subject.
pub const SUBJECT_PARAM: &str = "subject";
/// Name of the parameter carrying custom data.
pub const DATA_PARAM: &str = "data";

/// A string-keyed parameter map.
pub type ParamMap = BTreeMap<String, String>;

/// The three parameter maps of a CDEvent Run. Absent parameters are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedRequest {
    pub context: Option<ParamMap>,
    pub subject: Option<ParamMap>,
    pub data: Option<ParamMap>,
}

impl ParsedRequest {
    /// Classify every parameter, failing on the first one that does not fit.
    pub fn from_params(params: &[Param]) -> Result<Self> {
        let mut request = Self::default();
        for param in params {
            let map = match &param.value {
                ParamValue::Object(map) => map.clone(),
                other => {
                    return Err(ReconcileError::UnexpectedParamType {
                        param: param.name.clone(),
                        param_type: other.param_type(),
                    });
                }
            };
            let slot = match param.name.as_str() {
                CONTEXT_PARAM => &mut request.context,
                SUBJECT_PARAM => &mut request.subject,
                DATA_PARAM => &mut request.data,
                _ => return Err(ReconcileError::UnexpectedParamName(param.name.clone())),
            };
            *slot = Some(map);
        }
        Ok(request)
    }
}
