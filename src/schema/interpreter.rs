//! Derives display-ready filter fields from raw parameter metadata.
//!
//! Descriptors are filtered to the input section of the requested module,
//! ordered, merged into From/To range pairs, and sorted so mandatory fields
//! come first. The first three fields form the initial bucket; the rest are
//! the advanced bucket behind a disclosure toggle.

use super::descriptor::{ParameterDescriptor, RawDescriptor, SchemaError};

/// Fields shown before the advanced disclosure toggle.
pub const INITIAL_FIELD_COUNT: usize = 3;

/// Consolidated-statement reports whose parameter sets carry an `isSummary`
/// toggle and hidden plumbing parameters that must not reach the filter
/// form. Both are dropped before interpretation for these reports only.
pub const SUMMARY_STRIPPED_REPORTS: [i64; 2] = [1203, 1207];

const RANGE_FROM_PREFIX: &str = "From";
const RANGE_TO_PREFIX: &str = "To";

/// One display-ready filter: a single parameter or a bounded From/To pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterField {
    Single(ParameterDescriptor),
    Range {
        from: ParameterDescriptor,
        to: ParameterDescriptor,
    },
}

impl FilterField {
    /// Mandatory when any constituent descriptor is mandatory.
    pub fn is_mandatory(&self) -> bool {
        self.descriptors().any(|d| d.mandatory)
    }

    /// Primary name: the single descriptor's, or the "From" side of a pair.
    pub fn name(&self) -> &str {
        &self.primary().name
    }

    /// Human label of the primary descriptor.
    pub fn label(&self) -> &str {
        self.primary().label()
    }

    pub fn primary(&self) -> &ParameterDescriptor {
        match self {
            Self::Single(descriptor) => descriptor,
            Self::Range { from, .. } => from,
        }
    }

    /// Constituent descriptors, From before To.
    pub fn descriptors(&self) -> impl Iterator<Item = &ParameterDescriptor> + '_ {
        let (first, second) = match self {
            Self::Single(descriptor) => (descriptor, None),
            Self::Range { from, to } => (from, Some(to)),
        };
        std::iter::once(first).chain(second)
    }
}

/// The interpreted filter set of one report.
#[derive(Debug, Clone, Default)]
pub struct FilterLayout {
    fields: Vec<FilterField>,
    rejected: Vec<SchemaError>,
}

impl FilterLayout {
    /// All fields, mandatory first, stable within equal-mandatory runs.
    pub fn fields(&self) -> &[FilterField] {
        &self.fields
    }

    /// Fields shown up front.
    pub fn initial(&self) -> &[FilterField] {
        let cutoff = self.fields.len().min(INITIAL_FIELD_COUNT);
        &self.fields[..cutoff]
    }

    /// Fields behind the disclosure toggle.
    pub fn advanced(&self) -> &[FilterField] {
        if self.fields.len() > INITIAL_FIELD_COUNT {
            &self.fields[INITIAL_FIELD_COUNT..]
        } else {
            &[]
        }
    }

    pub fn has_advanced(&self) -> bool {
        self.fields.len() > INITIAL_FIELD_COUNT
    }

    /// Every accepted descriptor, in field order.
    pub fn descriptors(&self) -> impl Iterator<Item = &ParameterDescriptor> + '_ {
        self.fields.iter().flat_map(FilterField::descriptors)
    }

    /// Find a field by its primary name.
    pub fn field(&self, name: &str) -> Option<&FilterField> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Find a descriptor by item name, either side of a range pair.
    pub fn descriptor(&self, name: &str) -> Option<&ParameterDescriptor> {
        self.descriptors().find(|d| d.name == name)
    }

    /// Descriptors rejected during interpretation (unknown type tags).
    pub fn rejected(&self) -> &[SchemaError] {
        &self.rejected
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Interpret the raw descriptor list of a report for one module.
///
/// An empty or fully-filtered list yields an empty layout, never an error:
/// the report simply has no parameters.
pub fn interpret(raw: &[RawDescriptor], module_id: i64, report_id: i64) -> FilterLayout {
    let strip_summary = SUMMARY_STRIPPED_REPORTS.contains(&report_id);

    let mut rejected = Vec::new();
    let mut params: Vec<ParameterDescriptor> = Vec::new();
    for descriptor in raw {
        if strip_summary
            && (descriptor.is_hidden || descriptor.item_name.eq_ignore_ascii_case("isSummary"))
        {
            continue;
        }
        if !descriptor.is_input() || descriptor.module_id != module_id {
            continue;
        }
        match ParameterDescriptor::from_raw(descriptor) {
            Ok(param) => params.push(param),
            Err(err) => {
                tracing::warn!(%err, "rejected parameter descriptor");
                rejected.push(err);
            }
        }
    }

    params.sort_by_key(|d| d.order);

    let mut fields = pair_ranges(params);
    fields.sort_by_key(|f| !f.is_mandatory());

    FilterLayout { fields, rejected }
}

/// Merge From/To siblings into range pairs.
///
/// A "To…" descriptor is absorbed whenever an unconsumed "From…" sibling
/// exists anywhere in the set, so a pair is never rendered as two singles
/// regardless of relative order.
fn pair_ranges(params: Vec<ParameterDescriptor>) -> Vec<FilterField> {
    let mut consumed = vec![false; params.len()];
    let mut fields = Vec::with_capacity(params.len());

    for i in 0..params.len() {
        if consumed[i] {
            continue;
        }
        let name = params[i].name.clone();

        if let Some(base) = name.strip_prefix(RANGE_FROM_PREFIX) {
            let sibling = format!("{RANGE_TO_PREFIX}{base}");
            if let Some(j) = find_unconsumed(&params, &consumed, &sibling) {
                consumed[i] = true;
                consumed[j] = true;
                fields.push(FilterField::Range {
                    from: params[i].clone(),
                    to: params[j].clone(),
                });
                continue;
            }
        } else if let Some(base) = name.strip_prefix(RANGE_TO_PREFIX) {
            let sibling = format!("{RANGE_FROM_PREFIX}{base}");
            if let Some(j) = find_unconsumed(&params, &consumed, &sibling) {
                consumed[i] = true;
                consumed[j] = true;
                fields.push(FilterField::Range {
                    from: params[j].clone(),
                    to: params[i].clone(),
                });
                continue;
            }
        }

        consumed[i] = true;
        fields.push(FilterField::Single(params[i].clone()));
    }

    fields
}

fn find_unconsumed(
    params: &[ParameterDescriptor],
    consumed: &[bool],
    name: &str,
) -> Option<usize> {
    params
        .iter()
        .enumerate()
        .find_map(|(i, d)| (!consumed[i] && d.name == name).then_some(i))
}
