use orm_suites::{Capability, CapabilityProbe, SuiteModule};
use tracing::info;

use crate::options::Options;

/// The modules a run will execute, in order, and the drivers that were
/// found missing along the way.
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    pub modules: Vec<&'a SuiteModule>,
    pub skipped: Vec<Capability>,
}

impl Selection<'_> {
    pub fn names(&self) -> Vec<&'static str> {
        self.modules.iter().map(|m| m.name).collect()
    }

    /// One diagnostic line per missing capability.
    pub fn notices(&self) -> Vec<String> {
        self.skipped.iter().map(|c| c.skip_notice()).collect()
    }
}

/// Pick the modules to run from `catalog`, keeping catalog order.
///
/// Without `--all` or `--extra` only the core module runs and no probe is
/// consulted. Otherwise every extra module whose driver `probe` reports is
/// included, and `--extra` without `--all` drops the core module.
pub fn select<'a>(
    options: &Options,
    catalog: &'a [SuiteModule],
    probe: &dyn CapabilityProbe,
) -> Selection<'a> {
    let mut selection = Selection {
        modules: Vec::new(),
        skipped: Vec::new(),
    };

    if !(options.all || options.extra) {
        selection.modules = catalog.iter().filter(|m| m.is_core()).collect();
        return selection;
    }

    for module in catalog {
        match module.requires {
            Some(capability) if !probe.is_available(capability) => {
                if !selection.skipped.contains(&capability) {
                    info!(
                        driver = %capability,
                        feature = capability.feature(),
                        "optional driver unavailable"
                    );
                    selection.skipped.push(capability);
                }
            }
            _ => selection.modules.push(module),
        }
    }

    if options.extra && !options.all {
        selection.modules.retain(|m| !m.is_core());
    }

    info!(modules = ?selection.names(), "modules selected");
    selection
}
