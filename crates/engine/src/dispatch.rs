// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed tool dispatch

use lf_adapters::{Tool, TracedTool};
use lf_core::ToolId;
use std::sync::Arc;

/// One tool per [`ToolId`], resolved by exhaustive match
#[derive(Clone)]
pub struct ToolTable {
    pub search_leads: Arc<dyn Tool>,
    pub lookup_domain: Arc<dyn Tool>,
    pub enrich_emails: Arc<dyn Tool>,
    pub save_list: Arc<dyn Tool>,
    pub setup_monitor: Arc<dyn Tool>,
}

impl ToolTable {
    /// The same tool behind every id
    pub fn uniform(tool: impl Tool) -> Self {
        let tool: Arc<dyn Tool> = Arc::new(tool);
        Self {
            search_leads: Arc::clone(&tool),
            lookup_domain: Arc::clone(&tool),
            enrich_emails: Arc::clone(&tool),
            save_list: Arc::clone(&tool),
            setup_monitor: tool,
        }
    }

    /// Replace the tool behind one id
    pub fn with(mut self, id: ToolId, tool: impl Tool) -> Self {
        *self.slot(id) = Arc::new(tool);
        self
    }

    pub fn get(&self, id: ToolId) -> &dyn Tool {
        match id {
            ToolId::SearchLeads => self.search_leads.as_ref(),
            ToolId::LookupDomain => self.lookup_domain.as_ref(),
            ToolId::EnrichEmails => self.enrich_emails.as_ref(),
            ToolId::SaveList => self.save_list.as_ref(),
            ToolId::SetupMonitor => self.setup_monitor.as_ref(),
        }
    }

    /// Wrap every entry in [`TracedTool`]
    pub fn traced(mut self) -> Self {
        for id in ToolId::ALL {
            let slot = self.slot(id);
            let inner = Arc::clone(slot);
            *slot = Arc::new(TracedTool::new(id.as_str(), inner));
        }
        self
    }

    fn slot(&mut self, id: ToolId) -> &mut Arc<dyn Tool> {
        match id {
            ToolId::SearchLeads => &mut self.search_leads,
            ToolId::LookupDomain => &mut self.lookup_domain,
            ToolId::EnrichEmails => &mut self.enrich_emails,
            ToolId::SaveList => &mut self.save_list,
            ToolId::SetupMonitor => &mut self.setup_monitor,
        }
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
