//! The color-neighboring-apartments command.
//!
//! Glues the pieces together: validate the configuration, collect apartment
//! rooms from the host, plan the alternate tint, check the plan's inputs were
//! defined, and write the plan back in one unit of work. Hosts that only need a pass/fail answer call
//! [`ColorNeighboringApartments::execute`].

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::config::{validate_config, LabelerConfig};
use crate::error::{LabelError, Result};
use crate::labeler::plan_labels;
use crate::room::LabelSummary;
use crate::source::{check_plan_parameters, collect_apartment_rooms, RoomRecordSource};
use crate::unit_of_work::{apply_atomically, UnitOfWork};

/// Outcome reported to the host command layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandResult {
    Succeeded,
    Failed,
}

impl CommandResult {
    pub fn is_success(self) -> bool {
        self == CommandResult::Succeeded
    }
}

/// Marks every second neighboring apartment with the alternate tint.
#[derive(Debug, Clone, Default)]
pub struct ColorNeighboringApartments {
    pub config: LabelerConfig,
}

impl ColorNeighboringApartments {
    pub fn new(config: LabelerConfig) -> Self {
        Self { config }
    }

    /// Run the command, returning what was written or why nothing was.
    ///
    /// An empty room category succeeds without opening a unit of work.
    pub fn run<H>(&self, host: &mut H) -> Result<LabelSummary>
    where
        H: RoomRecordSource + UnitOfWork + ?Sized,
    {
        let problems = validate_config(&self.config);
        if !problems.is_empty() {
            return Err(LabelError::InvalidConfig(problems));
        }

        let ids = host.room_ids();
        if ids.is_empty() {
            info!("no rooms in document, nothing to color");
            return Ok(LabelSummary::default());
        }
        let rooms = collect_apartment_rooms(&*host, &ids, &self.config)?;

        let plan = plan_labels(&rooms, &self.config.tint_suffix);
        check_plan_parameters(&*host, &plan, &self.config)?;
        apply_atomically(
            host,
            &self.config.transaction_name,
            &self.config.parameters.sub_zone_index,
            &plan.mutations,
        )?;

        info!(
            "colored {} rooms in {} neighboring apartments ({} apartments, {} level/block partitions)",
            plan.summary.rooms_marked,
            plan.summary.pairs,
            plan.summary.apartments,
            plan.summary.partitions
        );
        Ok(plan.summary)
    }

    /// Run the command and collapse the outcome to success or failure.
    pub fn execute<H>(&self, host: &mut H) -> CommandResult
    where
        H: RoomRecordSource + UnitOfWork + ?Sized,
    {
        match self.run(host) {
            Ok(_) => CommandResult::Succeeded,
            Err(e) => {
                warn!("color neighboring apartments failed: {}", e);
                CommandResult::Failed
            }
        }
    }
}
