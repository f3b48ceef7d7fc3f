//! Built-in specification records for the work-assignment integration suite.
//!
//! Everything in this module is opaque business payload: the texts describe
//! integration flows (including prose about a time-overlap conflict
//! resolution algorithm) but none of that logic executes here.  The records
//! only feed the document builder.

use std::io::Cursor;

use image::{DynamicImage, ImageBuffer, ImageError, ImageOutputFormat, Rgb};

use crate::record::{ScriptStep, SpecificationRecord, TestCondition};

/// Generates a small solid-accent PNG usable as a cover logo when no brand
/// asset is supplied.
pub fn placeholder_logo() -> Result<Vec<u8>, ImageError> {
    let buffer = ImageBuffer::from_fn(150, 200, |x, y| {
        if x < 8 || y < 8 || x >= 142 || y >= 192 {
            Rgb([0x00u8, 0x70, 0xC0])
        } else {
            Rgb([0xFFu8, 0xFF, 0xFF])
        }
    });

    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(buffer).write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)?;
    Ok(bytes)
}

fn delete_work_assignment() -> SpecificationRecord {
    SpecificationRecord::new(
        "Delete Work Assignment",
        "SF_WorkAssignment_Delete",
        "/deleteWAList",
    )
    .with_classification(
        "SF-Nadec-WorkAssignment",
        "SAP Cloud Platform",
        "Hana Cloud Integration",
        "Background Online",
        "On-Demand (Called by conflict resolution)",
    )
    .with_overview(
        "Deletes work assignments in SuccessFactors by setting their approval status to \
         CANCELLED. This flow is called by the conflict resolution execute actions flow when \
         work assignments need to be removed due to time conflicts with timesheet events.",
    )
    .with_requirements([
        "Receives XML payload with work assignment IDs marked as deleted=true",
        "Filters and extracts only deleted work assignments",
        "Transforms XML to JSON format for SF OData API",
        "Sets approvalStatus to CANCELLED for each work assignment",
        "Executes upsert operation via SuccessFactors OData API",
    ])
    .with_scripts([
        ScriptStep::new(
            "Parse Delete List",
            "Reads XML <Item> nodes and filters items where deleted=true",
        ),
        ScriptStep::new(
            "Transform to SF Format",
            "Creates SF OData upsert payload with approvalStatus: CANCELLED",
        ),
        ScriptStep::new(
            "Prepare API Request",
            "Sets required headers and authentication for SF API call",
        ),
    ])
    .with_adapter(
        "Receiver (SF): SuccessFactors OData v2 API for Work Assignment entity\n\
         Authentication: Basic (NadecIntegAdmin)",
    )
    .with_test_conditions([
        TestCondition::new(
            "Work assignment IDs provided in XML with deleted=true",
            "Work assignments marked as CANCELLED in SuccessFactors",
        ),
        TestCondition::new(
            "Empty or malformed XML payload",
            "Error handling triggered, appropriate error message returned",
        ),
        TestCondition::new(
            "SF API authentication failure",
            "Error captured and logged, retry mechanism activated",
        ),
    ])
}

fn get_employee_timesheet_list() -> SpecificationRecord {
    SpecificationRecord::new(
        "Get Employee Timesheet List",
        "SF_TimeEvent_GetByEmployeeDate",
        "/timeEvent/getListOfEmployeeTimeSheet",
    )
    .with_classification(
        "SF-Nadec-WorkAssignment",
        "SAP Cloud Platform",
        "Hana Cloud Integration",
        "Background Online",
        "On-Demand (Called by orchestrator flows)",
    )
    .with_overview(
        "Retrieves timesheet events (C10 check-in and C20 check-out) from SuccessFactors, \
         groups them by date, and pairs check-ins with check-outs for each employee. This flow \
         processes time events and converts UTC timestamps to local time (Asia/Riyadh timezone).",
    )
    .with_requirements([
        "Fetch TimeEvent data from SuccessFactors OData API",
        "Filter events by employee ID and date range",
        "Group time events by local date (handling timezone offsets)",
        "Sort events by timestamp within each date",
        "Pair first C10 (check-in) with last C20 (check-out) per day",
        "Convert UTC timestamps to local time strings (HH:mm:ss format)",
        "Return structured JSON with employeeId, date, checkIn/Out IDs and times",
    ])
    .with_scripts([
        ScriptStep::new(
            "Fetch Time Events",
            "Calls SF OData API to retrieve TimeEvent records filtered by employee and date",
        ),
        ScriptStep::new(
            "Group by Date",
            "Groups events by local date, handles timezone offsets (Asia/Riyadh)",
        ),
        ScriptStep::new(
            "Pair Check-ins/Outs",
            "Sorts events and pairs first C10 with last C20 per day",
        ),
        ScriptStep::new(
            "Format Response",
            "Converts UTC to local time, structures output JSON with paired events",
        ),
        ScriptStep::new(
            "Handle Edge Cases",
            "Manages incomplete pairs, multiple check-ins/outs, and timezone conversions",
        ),
    ])
    .with_adapter(
        "Receiver (SF): SuccessFactors OData v2 API for TimeEvent entity\n\
         Authentication: OAuth Bearer Assertion (SF-Nadec-TimeEvent)",
    )
    .with_test_conditions([
        TestCondition::new(
            "Employee with normal check-in/check-out pairs",
            "Returns paired events with correct local times",
        ),
        TestCondition::new(
            "Employee with multiple check-ins on same day",
            "Pairs first check-in with last check-out",
        ),
        TestCondition::new(
            "Employee with no time events",
            "Returns empty array for timesheet data",
        ),
        TestCondition::new(
            "Cross-timezone date handling",
            "Events grouped correctly by local date, not UTC date",
        ),
    ])
}

fn get_work_assignment_list() -> SpecificationRecord {
    SpecificationRecord::new(
        "Get Work Assignment List",
        "SF_WorkAssignment_GetByDateRange",
        "/workAssignment",
    )
    .with_classification(
        "SF-Nadec-WorkAssignment",
        "SAP Cloud Platform",
        "Hana Cloud Integration",
        "Background Online",
        "Scheduled Daily / On-Demand",
    )
    .with_overview(
        "Fetches work assignments from SuccessFactors within a dynamic date range. The date \
         range is automatically calculated as: first day of 2 months ago to last day of current \
         month. For example, if executed on 2025-11-06, it retrieves work assignments from \
         2025-09-01 to 2025-11-30.",
    )
    .with_requirements([
        "Calculate dynamic date range: first day of (current month - 2) to last day of current month",
        "Build OData filter query with calculated date range",
        "Fetch work assignment records from SuccessFactors",
        "Use UTC timezone for date calculations",
        "Return work assignment data with employee IDs, dates, and time ranges",
    ])
    .with_scripts([
        ScriptStep::new(
            "Calculate Date Range",
            "Computes first day of 2 months ago and last day of current month using UTC",
        ),
        ScriptStep::new(
            "Build OData Filter",
            "Constructs filter: startDate ge datetime'...' and startDate le datetime'...'",
        ),
        ScriptStep::new(
            "Format Response",
            "Structures work assignment data for downstream processing",
        ),
    ])
    .with_adapter(
        "Receiver (SF): SuccessFactors OData v2 API for Work Assignment entity\n\
         Authentication: Basic (NadecIntegAdmin)",
    )
    .with_test_conditions([
        TestCondition::new(
            "Scheduled execution on any date",
            "Returns work assignments for calculated 3-month range",
        ),
        TestCondition::new(
            "Work assignments exist in date range",
            "All matching records retrieved successfully",
        ),
        TestCondition::new(
            "No work assignments in date range",
            "Returns empty result set without error",
        ),
        TestCondition::new(
            "SF API rate limit exceeded",
            "Retry mechanism handles rate limiting gracefully",
        ),
    ])
}

fn bulk_retrieval() -> SpecificationRecord {
    SpecificationRecord::new(
        "WA and TS Data Bulk Retrieval",
        "WA_TS_Combine_Bulk",
        "/getWAAndTimesheetBulk",
    )
    .with_classification(
        "SF-Nadec-WorkAssignment",
        "SAP Cloud Platform",
        "Hana Cloud Integration",
        "Background Online",
        "On-Demand (Batch Processing)",
    )
    .with_overview(
        "Batch processing flow that retrieves and combines multiple work assignments with their \
         corresponding timesheets. Optimized for bulk operations, this flow handles large \
         volumes of records efficiently by processing them in batches and implementing \
         appropriate delays for SF API rate limiting.",
    )
    .with_requirements([
        "Accept multiple work assignment records as JSON array input",
        "Convert JSON array to XML <Records> structure for processing",
        "Extract and save work assignment data to message property",
        "Fetch corresponding timesheet data for each work assignment",
        "Combine work assignment XML with timesheet JSON",
        "Apply 5-second delay for SF API rate limiting compliance",
        "Return combined XML with all work assignments and timesheets",
    ])
    .with_scripts([
        ScriptStep::new(
            "JSON to XML Conversion",
            "Converts input JSON array to XML <Records> structure",
        ),
        ScriptStep::new(
            "Extract WA Data",
            "Extracts work assignment data and saves to message property 'workAssignmentData'",
        ),
        ScriptStep::new(
            "Combine Data",
            "Merges work assignment XML with fetched timesheet JSON",
        ),
        ScriptStep::new(
            "Aggregate Results",
            "Combines multiple WA-TS pairs into single payload",
        ),
        ScriptStep::new(
            "Format Output",
            "Structures final XML output with <WorkAssignment> and <Timesheet> sections",
        ),
        ScriptStep::new(
            "Rate Limit Handler",
            "Implements 5-second delay (Thread.sleep) between batch operations",
        ),
    ])
    .with_adapter(
        "Receiver (SF): Multiple API calls\n\
         - Work Assignment OData API\n\
         - TimeEvent OData API\n\
         Authentication: Basic + OAuth Bearer",
    )
    .with_test_conditions([
        TestCondition::new(
            "Bulk input with 100 work assignments",
            "All records processed, combined with timesheets successfully",
        ),
        TestCondition::new(
            "Work assignments with no matching timesheets",
            "Returns WA data with empty timesheet sections",
        ),
        TestCondition::new(
            "SF API rate limiting triggered",
            "5-second delay prevents rate limit errors",
        ),
        TestCondition::new(
            "Large payload > 10MB",
            "Chunking mechanism handles large data volumes",
        ),
    ])
}

fn conflict_analyze() -> SpecificationRecord {
    SpecificationRecord::new(
        "WA Conflict Resolution - Analyze Logic",
        "WA_TS_Conflict_Analyze",
        "/resovleWAConfilict",
    )
    .with_classification(
        "SF-Nadec-WorkAssignment",
        "SAP Cloud Platform",
        "Hana Cloud Integration",
        "Background Online",
        "On-Demand (Called by orchestrator)",
    )
    .with_overview(
        "CORE CONFLICT DETECTION ENGINE: Analyzes time overlaps between work assignments \
         (scheduled work times) and timesheet events (actual check-in/check-out times). \
         Implements business rules to resolve conflicts by determining which records to delete \
         or trim. Uses Asia/Riyadh timezone for all time calculations.",
    )
    .with_requirements([
        "Receive JSON array with paired work assignments and timesheets",
        "Detect time overlaps between WA (startTime-endTime) and TS (checkIn-checkOut)",
        "Apply resolution rules based on overlap type",
        "Generate delete lists for work assignments and timesheets",
        "Create new TimeEvent records for trimmed times (±1 minute adjustment)",
        "Return structured JSON with resolved items and actions",
    ])
    .with_scripts([
        ScriptStep::new(
            "Parse Input Data",
            "Extracts work assignment and timesheet pairs from input JSON",
        ),
        ScriptStep::new(
            "CORE ALGORITHM: Detect Overlaps",
            "Compares time ranges: !(tsOut < waStart || tsIn > waEnd). Rules:\n\
             1. WA fully inside TS → Delete WA\n\
             2. TS fully inside WA → Delete TS (C10 and C20)\n\
             3. Partial overlap (TS starts before) → Trim TS checkout to WA start - 1 min\n\
             4. Partial overlap (TS ends after) → Trim TS checkin to WA end + 1 min\n\
             5. Other overlaps → Delete WA (fallback)",
        ),
        ScriptStep::new(
            "Generate Delete Lists",
            "Creates timesheetDelete and workAssignmentDelete arrays with IDs",
        ),
        ScriptStep::new(
            "Create Trim Events",
            "Generates new C10/C20 TimeEvent records with adjusted times",
        ),
        ScriptStep::new(
            "Format Output",
            "Structures JSON: {resolvedItems, timesheetDelete, workAssignmentDelete, timeEventInsert}",
        ),
    ])
    .with_adapter(
        "Internal processing only (no external adapter)\n\
         Called via HTTP by orchestrator flows",
    )
    .with_test_conditions([
        TestCondition::new(
            "WA: 08:00-17:00, TS: 07:30-18:00 (WA inside TS)",
            "Delete WA, keep TS",
        ),
        TestCondition::new(
            "WA: 08:00-17:00, TS: 09:00-16:00 (TS inside WA)",
            "Delete TS C10+C20, keep WA",
        ),
        TestCondition::new(
            "WA: 08:00-17:00, TS: 07:00-09:00 (TS starts before)",
            "Trim TS C20 to 07:59, keep WA",
        ),
        TestCondition::new(
            "WA: 08:00-17:00, TS: 16:00-19:00 (TS ends after)",
            "Trim TS C10 to 17:01, keep WA",
        ),
        TestCondition::new(
            "No overlap between WA and TS",
            "No action taken, both records preserved",
        ),
    ])
}

fn conflict_core_orchestrator() -> SpecificationRecord {
    // The original record omits the module field for this flow; kept as-is.
    SpecificationRecord::new(
        "WA Conflict Resolution - Core Orchestrator",
        "WA_TS_Conflict_CoreOrchestrator",
        "/resolveWAConflictMain",
    )
    .with_classification(
        "SF-Nadec-WorkAssignment",
        "",
        "Hana Cloud Integration",
        "Background Online",
        "On-Demand (Orchestration)",
    )
    .with_overview(
        "CORE ORCHESTRATOR: Coordinates the conflict resolution process. Expects combined work \
         assignment and timesheet data as input, orchestrates conflict analysis by calling the \
         Analyze Logic flow, then executes the resolved actions by calling the Execute Actions \
         flow. This is a pure orchestrator with no business logic in scripts.",
    )
    .with_requirements([
        "Receive combined WA+TS data (XML or JSON)",
        "Call Analyze Logic flow to detect and resolve conflicts",
        "Receive resolution output (delete lists, trim events)",
        "Call Execute Actions flow to apply changes in SuccessFactors",
        "Return final execution status and results",
    ])
    .with_scripts([
        ScriptStep::new("Validate Input", "Checks input data structure and completeness"),
        ScriptStep::new(
            "Prepare Analysis Call",
            "Formats payload for Analyze Logic endpoint",
        ),
        ScriptStep::new(
            "Prepare Action Call",
            "Formats resolution output for Execute Actions endpoint",
        ),
        ScriptStep::new(
            "Aggregate Results",
            "Combines analysis and execution results for final response",
        ),
    ])
    .with_adapter(
        "Internal orchestration:\n\
         - Calls: WA Conflict Resolution - Analyze Logic\n\
         - Calls: WA Conflict Resolution - Execute Actions",
    )
    .with_test_conditions([
        TestCondition::new(
            "Combined WA+TS data with conflicts",
            "Analyzes and executes resolution successfully",
        ),
        TestCondition::new(
            "Analyze Logic flow returns empty actions",
            "Execute Actions not called, process completes",
        ),
        TestCondition::new(
            "Execute Actions flow fails",
            "Error handling captures failure, rolls back if needed",
        ),
        TestCondition::new(
            "Large dataset with 1000+ pairs",
            "Processes all pairs efficiently, handles timeouts",
        ),
    ])
}

fn conflict_end_to_end() -> SpecificationRecord {
    SpecificationRecord::new(
        "WA Conflict Resolution - End to End",
        "WA_TS_Conflict_EndToEnd",
        "/resolveWAMain",
    )
    .with_classification(
        "SF-Nadec-WorkAssignment",
        "SAP Cloud Platform",
        "Hana Cloud Integration",
        "Background Online",
        "Scheduled Daily / On-Demand",
    )
    .with_overview(
        "END-TO-END ORCHESTRATOR: Complete conflict resolution process from data retrieval to \
         action execution. Fetches work assignments and timesheets from SuccessFactors, \
         combines them, analyzes conflicts, and executes resolutions. This is the main entry \
         point for automated conflict resolution jobs.",
    )
    .with_requirements([
        "Fetch work assignments for date range (calls Get Work Assignment List)",
        "Fetch corresponding timesheets (calls Get Employee Timesheet List)",
        "Combine WA and TS data (calls WA and TS Data Bulk Retrieval)",
        "Analyze conflicts (calls WA Conflict Resolution - Analyze Logic)",
        "Execute resolutions (calls WA Conflict Resolution - Execute Actions)",
        "Return comprehensive results with statistics",
    ])
    .with_scripts([
        ScriptStep::new(
            "Initiate Process",
            "Sets up date range and initializes counters",
        ),
        ScriptStep::new(
            "Fetch WA Data",
            "Calls external iFlow: WA and TS Data Bulk Retrieval",
        ),
        ScriptStep::new(
            "Orchestrate Resolution",
            "Calls: WA Conflict Resolution - Core Orchestrator",
        ),
        ScriptStep::new(
            "Aggregate Statistics",
            "Counts resolved items, deletions, trims, and errors",
        ),
    ])
    .with_adapter(
        "Orchestrates multiple flows:\n\
         - Get Work Assignment List\n\
         - WA and TS Data Bulk Retrieval\n\
         - WA Conflict Resolution - Core Orchestrator",
    )
    .with_test_conditions([
        TestCondition::new(
            "Scheduled daily execution",
            "Processes all WA-TS pairs for configured date range",
        ),
        TestCondition::new(
            "100 conflicts detected and resolved",
            "All conflicts analyzed and actions executed successfully",
        ),
        TestCondition::new(
            "SF API temporarily unavailable",
            "Retry mechanism handles transient failures",
        ),
        TestCondition::new(
            "Process exceeds 10-minute timeout",
            "Chunks processing into smaller batches",
        ),
    ])
}

fn conflict_execute() -> SpecificationRecord {
    SpecificationRecord::new(
        "WA Conflict Resolution - Execute Actions",
        "WA_TS_Conflict_Execute",
        "/resolveWAConflictAction",
    )
    .with_classification(
        "SF-Nadec-WorkAssignment",
        "SAP Cloud Platform",
        "Hana Cloud Integration",
        "Background Online",
        "On-Demand (Called by orchestrator)",
    )
    .with_overview(
        "ACTION EXECUTOR: Executes conflict resolution actions in SuccessFactors based on \
         analysis output. Performs three types of operations: (1) Delete work assignments by \
         setting status to CANCELLED, (2) Delete timesheet events (C10/C20), (3) Insert new \
         timesheet events for trimmed times.",
    )
    .with_requirements([
        "Receive resolution output from Analyze Logic flow",
        "Extract delete lists: timesheetDelete, workAssignmentDelete",
        "Extract insert list: timeEventInsert (for trimmed times)",
        "Execute work assignment deletions (calls Delete Work Assignment flow)",
        "Execute timesheet deletions via SF TimeEvent OData API",
        "Create new timesheet events for trimmed times via SF TimeEvent API",
        "Handle batch operations for multiple records",
        "Return execution results with success/failure counts",
    ])
    .with_scripts([
        ScriptStep::new(
            "Parse Resolution Data",
            "Extracts delete and insert arrays from input JSON",
        ),
        ScriptStep::new(
            "Execute WA Deletions",
            "Transforms WA IDs to XML, calls Delete Work Assignment flow",
        ),
        ScriptStep::new(
            "Execute TS Deletions",
            "Formats C10/C20 IDs for SF OData delete API, executes batch delete",
        ),
        ScriptStep::new(
            "Create Trimmed Events",
            "Generates new TimeEvent records with adjusted times (±1 min), posts to SF",
        ),
        ScriptStep::new(
            "Aggregate Results",
            "Counts successful/failed operations, structures response",
        ),
    ])
    .with_adapter(
        "Receiver (SF): Multiple operations\n\
         - Delete WA: Calls SF_WorkAssignment_Delete flow\n\
         - Delete TS: SF TimeEvent OData API (DELETE)\n\
         - Insert TS: SF TimeEvent API (POST)\n\
         Authentication: Basic + OAuth Bearer",
    )
    .with_test_conditions([
        TestCondition::new(
            "10 WA deletions, 5 TS deletions, 3 TS inserts",
            "All operations executed successfully",
        ),
        TestCondition::new(
            "SF API rejects TS insert (validation error)",
            "Error captured, other operations continue",
        ),
        TestCondition::new(
            "Duplicate TS event in insert list",
            "SF handles duplicate, returns appropriate error",
        ),
        TestCondition::new(
            "Network timeout during execution",
            "Retry mechanism handles timeout, resumes from last successful operation",
        ),
    ])
}

/// Returns the eight built-in flow records in their canonical order.
pub fn builtin_records() -> Vec<SpecificationRecord> {
    vec![
        delete_work_assignment(),
        get_employee_timesheet_list(),
        get_work_assignment_list(),
        bulk_retrieval(),
        conflict_analyze(),
        conflict_core_orchestrator(),
        conflict_end_to_end(),
        conflict_execute(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_builtin_records_validate() {
        let records = builtin_records();
        assert_eq!(records.len(), 8);
        for record in &records {
            assert!(
                record.validate().is_ok(),
                "record '{}' should validate",
                record.identity()
            );
        }
    }

    #[test]
    fn technical_names_are_unique() {
        let records = builtin_records();
        let mut names: Vec<_> = records
            .iter()
            .map(SpecificationRecord::technical_name)
            .collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), records.len());
    }

    #[test]
    fn placeholder_logo_is_png() {
        let bytes = placeholder_logo().expect("logo encodes");
        assert_eq!(&bytes[1..4], b"PNG");
    }
}
