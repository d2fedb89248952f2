//! View-model assembly: joins primary records with related records fetched
//! from other endpoints.
//!
//! Lookups for one record run concurrently, and so do the records of a batch.
//! A relation that cannot be resolved becomes `None` on the view-model; only a
//! failure at the primary level (an application whose job is gone) drops the
//! record.

use std::collections::HashMap;

use board_logging::{board_debug, board_info, board_warn};
use futures_util::future::join_all;
use jobboard_core::{Application, ApplicationView, Id, JobPosting, JobView};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::client::{decode, ResourceClient};
use crate::{ApiError, FailureKind, Resource};

/// How a relation's foreign key leads to the related record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationPath {
    /// `GET /{target}/{record[foreign_key]}`
    Direct {
        foreign_key: &'static str,
        target: Resource,
    },
    /// `GET /{link}?{link_key}={record.id}`, then
    /// `GET /{target}/{first_row[target_key]}`
    Linked {
        link: Resource,
        link_key: &'static str,
        target_key: &'static str,
        target: Resource,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationDescriptor {
    /// Field name the resolved record is attached under.
    pub name: &'static str,
    pub path: RelationPath,
}

pub const EMPLOYER: RelationDescriptor = RelationDescriptor {
    name: "employer",
    path: RelationPath::Direct {
        foreign_key: "employerId",
        target: Resource::Employers,
    },
};

pub const CATEGORY: RelationDescriptor = RelationDescriptor {
    name: "category",
    path: RelationPath::Linked {
        link: Resource::JobCategories,
        link_key: "jobPostId",
        target_key: "categoryId",
        target: Resource::Categories,
    },
};

pub const LOCATION: RelationDescriptor = RelationDescriptor {
    name: "location",
    path: RelationPath::Linked {
        link: Resource::JobLocations,
        link_key: "jobPostId",
        target_key: "locationId",
        target: Resource::Locations,
    },
};

pub const JOB: RelationDescriptor = RelationDescriptor {
    name: "job",
    path: RelationPath::Direct {
        foreign_key: "jobPostId",
        target: Resource::JobPosts,
    },
};

/// Relations attached to every job posting.
pub const JOB_RELATIONS: [RelationDescriptor; 3] = [EMPLOYER, CATEGORY, LOCATION];

/// Related records found for one primary record, keyed by relation name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedRelations {
    values: HashMap<&'static str, Value>,
}

impl ResolvedRelations {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn take(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    /// Removes and decodes a relation; a record that does not decode counts
    /// as unresolved.
    pub fn take_as<T: DeserializeOwned>(&mut self, name: &str) -> Option<T> {
        let value = self.take(name)?;
        match decode(value) {
            Ok(record) => Some(record),
            Err(err) => {
                board_warn!("Relation {} did not decode: {}", name, err);
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Resolves every descriptor for `record` concurrently.
///
/// Never fails: an empty or failed lookup leaves that relation out.
pub async fn resolve_relations(
    client: &dyn ResourceClient,
    record: &Value,
    descriptors: &[RelationDescriptor],
) -> ResolvedRelations {
    let lookups = descriptors.iter().map(|descriptor| async move {
        (descriptor.name, resolve_one(client, record, descriptor).await)
    });

    let mut resolved = ResolvedRelations::default();
    for (name, outcome) in join_all(lookups).await {
        match outcome {
            Ok(Some(value)) => {
                resolved.values.insert(name, value);
            }
            Ok(None) => {
                board_debug!("Relation {} of record {:?} is empty", name, record.get("id"));
            }
            Err(err) => {
                board_warn!(
                    "Relation {} of record {:?} failed: {}",
                    name,
                    record.get("id"),
                    err
                );
            }
        }
    }
    resolved
}

async fn resolve_one(
    client: &dyn ResourceClient,
    record: &Value,
    descriptor: &RelationDescriptor,
) -> Result<Option<Value>, ApiError> {
    match descriptor.path {
        RelationPath::Direct {
            foreign_key,
            target,
        } => {
            let Some(id) = id_field(record, foreign_key) else {
                return Ok(None);
            };
            fetch_optional(client, target, &id).await
        }
        RelationPath::Linked {
            link,
            link_key,
            target_key,
            target,
        } => {
            let Some(record_id) = id_field(record, "id") else {
                return Ok(None);
            };
            let rows = client.list(link, &[(link_key, record_id.as_str())]).await?;
            let Some(target_id) = rows.first().and_then(|row| id_field(row, target_key)) else {
                return Ok(None);
            };
            fetch_optional(client, target, &target_id).await
        }
    }
}

async fn fetch_optional(
    client: &dyn ResourceClient,
    resource: Resource,
    id: &Id,
) -> Result<Option<Value>, ApiError> {
    match client.get(resource, id).await {
        Ok(Value::Object(map)) if map.is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(err) if err.kind == FailureKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

/// Reads `record[key]` with the same normalisation as a decoded [`Id`].
pub(crate) fn id_field(record: &Value, key: &str) -> Option<Id> {
    let id = Id::deserialize(record.get(key)?).ok()?;
    (!id.as_str().is_empty()).then_some(id)
}

/// Joins each raw posting with its employer, category and location.
///
/// Output order follows input order; postings that do not decode are dropped.
pub async fn assemble_jobs(client: &dyn ResourceClient, records: &[Value]) -> Vec<JobView> {
    let views = records.iter().map(|record| async move {
        let job: JobPosting = match decode(record.clone()) {
            Ok(job) => job,
            Err(err) => {
                board_warn!("Dropping malformed job posting {:?}: {}", record.get("id"), err);
                return None;
            }
        };
        let mut relations = resolve_relations(client, record, &JOB_RELATIONS).await;
        Some(JobView {
            job,
            employer: relations.take_as(EMPLOYER.name),
            category: relations.take_as(CATEGORY.name),
            location: relations.take_as(LOCATION.name),
        })
    });
    join_all(views).await.into_iter().flatten().collect()
}

/// Joins each raw application with its job and the job's employer.
///
/// An application whose job cannot be resolved is dropped and logged.
pub async fn assemble_applications(
    client: &dyn ResourceClient,
    records: &[Value],
) -> Vec<ApplicationView> {
    let views = records
        .iter()
        .map(|record| assemble_application(client, record));
    join_all(views).await.into_iter().flatten().collect()
}

async fn assemble_application(
    client: &dyn ResourceClient,
    record: &Value,
) -> Option<ApplicationView> {
    let application: Application = match decode(record.clone()) {
        Ok(application) => application,
        Err(err) => {
            board_warn!("Dropping malformed application {:?}: {}", record.get("id"), err);
            return None;
        }
    };

    let mut primary = resolve_relations(client, record, &[JOB]).await;
    let Some(job_value) = primary.take(JOB.name) else {
        board_warn!(
            "Dropping application {}: job {} is unavailable",
            application.id,
            application.job_post_id
        );
        return None;
    };
    let job: JobPosting = match decode(job_value.clone()) {
        Ok(job) => job,
        Err(err) => {
            board_warn!("Dropping application {}: job did not decode: {}", application.id, err);
            return None;
        }
    };

    let mut related = resolve_relations(client, &job_value, &[EMPLOYER]).await;
    Some(ApplicationView {
        application,
        job,
        employer: related.take_as(EMPLOYER.name),
    })
}

/// Lists job postings, optionally only those of one employer, and assembles
/// them. Failing to list is a page-level error.
pub async fn load_job_board(
    client: &dyn ResourceClient,
    employer_id: Option<&Id>,
) -> Result<Vec<JobView>, ApiError> {
    let query: Vec<(&str, &str)> = employer_id
        .map(|id| vec![("employerId", id.as_str())])
        .unwrap_or_default();
    let records = client.list(Resource::JobPosts, &query).await?;
    let views = assemble_jobs(client, &records).await;
    board_info!("Assembled {} of {} job postings", views.len(), records.len());
    Ok(views)
}
