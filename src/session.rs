//! One operator session over a selected report: load the parameter
//! metadata, fill values, resolve lookups, validate, run, and page the
//! result.

use std::sync::Arc;

use thiserror::Error;

use crate::config::Settings;
use crate::context::SessionContext;
use crate::filter::{self, FieldValue, FilterValueStore, MissingField, ValidationError};
use crate::lookup::{LookupOption, LookupOutcome, LookupResolver};
use crate::render;
use crate::report::{
    locate, ExecutionError, ExecutionOutcome, LocatorError, ModuleCatalog, Pager, ReportExecutor,
};
use crate::schema::{interpret, FilterLayout, RawDescriptor};
use crate::service::{QueryService, ReportRow};

/// Everything that can stop a run.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Locator(#[from] LocatorError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

/// Result-set state of the session.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultState {
    /// No run has completed for the current report.
    NotRun,
    /// The last run succeeded but returned no rows.
    Empty,
    /// Rows of the last successful run.
    Rows(Vec<ReportRow>),
}

/// Orchestrates the report lifecycle for one operator.
pub struct ReportSession {
    layout: FilterLayout,
    store: FilterValueStore,
    resolver: LookupResolver,
    executor: ReportExecutor,
    catalog: ModuleCatalog,
    context: Arc<SessionContext>,
    module_id: i64,
    result: ResultState,
    pager: Pager,
}

impl ReportSession {
    pub fn new(
        service: Arc<dyn QueryService>,
        context: Arc<SessionContext>,
        catalog: ModuleCatalog,
        settings: &Settings,
    ) -> Self {
        Self {
            layout: FilterLayout::default(),
            store: FilterValueStore::default(),
            resolver: LookupResolver::with_settings(
                service.clone(),
                context.clone(),
                &settings.lookup,
            ),
            executor: ReportExecutor::new(service),
            catalog,
            context,
            module_id: 0,
            result: ResultState::NotRun,
            pager: Pager::new(settings.results.page_size),
        }
    }

    /// Load a report's descriptor set, recreating the layout, the value
    /// store and the result state.
    pub fn load_report(&mut self, descriptors: &[RawDescriptor], module_id: i64, report_id: i64) {
        self.layout = interpret(descriptors, module_id, report_id);
        self.store = FilterValueStore::seed(&self.layout, &self.context);
        self.module_id = module_id;
        self.result = ResultState::NotRun;
        self.pager = Pager::new(self.pager.page_size());
        tracing::debug!(
            module_id,
            report_id,
            field_count = self.layout.len(),
            "report loaded"
        );
    }

    pub fn layout(&self) -> &FilterLayout {
        &self.layout
    }

    pub fn values(&self) -> &FilterValueStore {
        &self.store
    }

    pub fn set_value(&mut self, name: impl Into<String>, value: FieldValue) {
        self.store.set(name, value);
    }

    pub fn missing_fields(&self) -> Vec<MissingField> {
        filter::missing_fields(&self.layout, &self.store)
    }

    /// Resolve lookup options for a field, degrading failures to no
    /// options; a lookup never blocks the form.
    pub async fn lookup(&self, field_name: &str, term: &str) -> Vec<LookupOption> {
        let Some(field) = self.layout.descriptor(field_name) else {
            return Vec::new();
        };
        match self.resolver.resolve(field, term, &self.store).await {
            Ok(LookupOutcome::Options(options)) => options,
            Ok(LookupOutcome::Superseded) => Vec::new(),
            Err(err) => {
                tracing::warn!(%err, field = field_name, "lookup degraded to empty options");
                Vec::new()
            }
        }
    }

    /// Validate, serialize, locate and execute the current report.
    ///
    /// The previous result set is discarded before the request goes out.
    pub async fn run(&mut self) -> Result<(), ReportError> {
        filter::validate(&self.layout, &self.store)?;
        let payload = filter::serialize(&self.layout, &self.store);
        let procedure = locate(&self.catalog, self.module_id)?.to_string();

        self.result = ResultState::NotRun;
        let outcome = self
            .executor
            .run(&procedure, payload, self.module_id)
            .await?;
        self.result = match outcome {
            ExecutionOutcome::Rows(rows) => ResultState::Rows(rows),
            ExecutionOutcome::Empty => ResultState::Empty,
        };
        self.pager = Pager::new(self.pager.page_size());
        Ok(())
    }

    pub fn result(&self) -> &ResultState {
        &self.result
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.pager.set_page_size(page_size);
    }

    pub fn set_page_index(&mut self, page_index: usize) {
        self.pager.set_page_index(page_index);
    }

    /// Rows of the current page; empty while no rows are loaded.
    pub fn visible_rows(&self) -> &[ReportRow] {
        match &self.result {
            ResultState::Rows(rows) => self.pager.visible(rows),
            _ => &[],
        }
    }

    /// Text rendering of the current result state.
    pub fn render_results(&self) -> String {
        match &self.result {
            ResultState::NotRun => String::new(),
            ResultState::Empty => render::NO_DATA_MESSAGE.to_string(),
            ResultState::Rows(rows) => render::render_page(rows, &self.pager),
        }
    }
}
