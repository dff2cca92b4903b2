//! Built-in registry used when the configuration file declares no
//! `[[services]]` or `[[selectors]]`.

use crate::domain::model::{SelectorEntry, ServiceDescriptor};

pub const DEFAULT_CSV_DIR: &str = "csv-files";
pub const DEFAULT_ZIP_DIR: &str = "zip-files";
pub const DEFAULT_ARCHIVE_NAME: &str = "AWS_export_data";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_CONCURRENCY: usize = 4;

pub fn default_services() -> Vec<ServiceDescriptor> {
    vec![
        ServiceDescriptor::new(
            "lambda",
            "list_functions",
            "Functions",
            &["FunctionName", "Runtime", "Timeout", "MemorySize", "FunctionArn", "Role"],
        ),
        ServiceDescriptor::new(
            "stepfunctions",
            "list_state_machines",
            "stateMachines",
            &["name", "stateMachineArn", "creationDate"],
        ),
        ServiceDescriptor::new(
            "eventbridge",
            "list_rules",
            "Rules",
            &["Name", "Arn", "ScheduleExpression", "State", "Description"],
        ),
        ServiceDescriptor::new("s3", "list_buckets", "Buckets", &["Name", "CreationDate"]),
        // TableMappings is a JSON document and would only export as N/A.
        ServiceDescriptor::new(
            "dms",
            "describe_replication_tasks",
            "ReplicationTasks",
            &[
                "ReplicationTaskIdentifier",
                "Status",
                "ReplicationTaskArn",
                "StopReason",
                "LastFailureMessage",
            ],
        ),
        ServiceDescriptor::new(
            "glue",
            "get_jobs",
            "Jobs",
            &[
                "Name",
                "Role",
                "CreatedOn",
                "LastModifiedOn",
                "MaxRetries",
                "AllocatedCapacity",
                "Timeout",
                "MaxCapacity",
                "WorkerType",
                "NumberOfWorkers",
                "GlueVersion",
            ],
        ),
    ]
}

pub fn default_selectors() -> Vec<SelectorEntry> {
    vec![
        SelectorEntry::new("-lb", "lambda_functions", "lambda"),
        SelectorEntry::new("-sf", "step_functions", "stepfunctions"),
        SelectorEntry::new("-eb", "eventbridge_rules", "eventbridge"),
        SelectorEntry::new("-s3", "s3_buckets", "s3"),
        SelectorEntry::new("-ds", "dms_tasks", "dms"),
        SelectorEntry::new("-gl", "glue_jobs", "glue"),
    ]
}
