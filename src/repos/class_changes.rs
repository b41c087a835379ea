//! Class-change slot resolution.

use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use crate::error::Result;
use crate::model::{ClassChangeType, UnitJob};
use crate::repository::MasterDataRepo;
use crate::repos::JobsRepo;
use crate::schema::records::JobChangePatternRow;

pub struct CcRepo {
    jobs: Rc<JobsRepo>,
    patterns: HashMap<i32, JobChangePatternRow>,
}

impl CcRepo {
    pub fn new(repo: &MasterDataRepo, jobs: Rc<JobsRepo>) -> Result<CcRepo> {
        Ok(CcRepo {
            jobs,
            patterns: repo.index(|r: &JobChangePatternRow| r.unit_id)?,
        })
    }

    /// Occupied class-change slots of one unit. Units without a pattern row
    /// have no slots at all.
    pub fn unit_cc(&self, unit_id: i32) -> Result<BTreeMap<ClassChangeType, Rc<UnitJob>>> {
        let mut cc = BTreeMap::new();
        if let Some(pattern) = self.patterns.get(&unit_id) {
            for slot in ClassChangeType::ALL {
                if let Some(job_id) = pattern.job_for(slot) {
                    cc.insert(slot, self.jobs.job(job_id)?);
                }
            }
        }
        Ok(cc)
    }
}
