//! Resolves a report's executable identity from the module catalog.

use serde::Deserialize;
use thiserror::Error;

/// Locator failures are fatal for the report session; there is nothing the
/// operator can correct.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocatorError {
    #[error("no report module matches id {0}")]
    ModuleNotFound(i64),

    #[error("report module {0} has no stored procedure configured")]
    MissingProcedure(i64),
}

/// Primary catalog entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportModule {
    #[serde(rename = "ModuleID", alias = "moduleId")]
    pub module_id: i64,

    #[serde(rename = "ModuleCaption", alias = "moduleCaption", default)]
    pub caption: Option<String>,

    #[serde(rename = "StoredProcedureName", alias = "storedProcedureName", default)]
    pub stored_procedure: Option<String>,
}

/// Secondary catalog entry, registered under the alternate id field.
#[derive(Debug, Clone, Deserialize)]
pub struct SubReportModule {
    #[serde(rename = "SubModuleID", alias = "subModuleId")]
    pub sub_module_id: i64,

    #[serde(rename = "StoredProcedureName", alias = "storedProcedureName", default)]
    pub stored_procedure: Option<String>,
}

/// Module metadata for the reports visible to the current operator.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModuleCatalog {
    #[serde(default)]
    pub modules: Vec<ReportModule>,

    #[serde(default)]
    pub sub_modules: Vec<SubReportModule>,
}

/// Resolve the stored-procedure name for a module id.
///
/// The primary list is searched first; the secondary list answers for
/// modules registered under the alternate id field. An empty procedure name
/// counts as not configured.
pub fn locate(catalog: &ModuleCatalog, module_id: i64) -> Result<&str, LocatorError> {
    if let Some(module) = catalog.modules.iter().find(|m| m.module_id == module_id) {
        return procedure_of(module.stored_procedure.as_deref(), module_id);
    }
    if let Some(module) = catalog
        .sub_modules
        .iter()
        .find(|m| m.sub_module_id == module_id)
    {
        return procedure_of(module.stored_procedure.as_deref(), module_id);
    }
    Err(LocatorError::ModuleNotFound(module_id))
}

fn procedure_of(procedure: Option<&str>, module_id: i64) -> Result<&str, LocatorError> {
    procedure
        .filter(|p| !p.is_empty())
        .ok_or(LocatorError::MissingProcedure(module_id))
}
