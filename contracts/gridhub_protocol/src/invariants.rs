#![allow(dead_code)]

extern crate std;

use crate::types::{Task, TaskStatus};

/// INV-1: Task status only ever advances forward. Every observable
/// transition is between adjacent statuses; the zero-review shortcut
/// passes through `Completed` and `Reviewed` inside one call, so it
/// never skips a predecessor.
pub fn assert_valid_status_transition(from: &TaskStatus, to: &TaskStatus) {
    let valid = matches!(
        (from, to),
        (TaskStatus::Created, TaskStatus::Assigned)
            | (TaskStatus::Assigned, TaskStatus::InProgress)
            | (TaskStatus::InProgress, TaskStatus::Completed)
            | (TaskStatus::Completed, TaskStatus::Reviewed)
            | (TaskStatus::Reviewed, TaskStatus::Paid)
    );

    assert!(
        valid,
        "INV-1 violated: invalid status transition from {:?} to {:?}",
        from, to
    );
}

/// INV-2: Observed status never moves backwards between two reads.
pub fn assert_forward_progress(before: &TaskStatus, after: &TaskStatus) {
    assert!(
        after >= before,
        "INV-2 violated: status regressed from {:?} to {:?}",
        before,
        after
    );
}

/// INV-3: The paid flag is set exactly for tasks in the terminal state.
pub fn assert_paid_consistency(task: &Task) {
    assert_eq!(
        task.paid,
        task.status == TaskStatus::Paid,
        "INV-3 violated: task {} paid flag ({}) disagrees with status {:?}",
        task.id,
        task.paid,
        task.status
    );
}

/// INV-4: A reviewed task collected at least the required approvals.
pub fn assert_review_threshold(task: &Task) {
    if task.status >= TaskStatus::Reviewed && task.reviews_required > 0 {
        assert!(
            task.approvals >= task.reviews_required,
            "INV-4 violated: task {} is {:?} with {}/{} approvals",
            task.id,
            task.status,
            task.approvals,
            task.reviews_required
        );
    }
}

/// INV-5: Entity ids are sequential starting from 0.
pub fn assert_sequential_ids(ids: &[u64]) {
    for (i, id) in ids.iter().enumerate() {
        assert_eq!(
            *id, i as u64,
            "INV-5 violated: expected id {}, got {}",
            i, id
        );
    }
}

/// INV-6: member_count never decreases (membership is not revocable).
pub fn assert_member_count_monotonic(before: u32, after: u32) {
    assert!(
        after >= before,
        "INV-6 violated: member_count decreased from {} to {}",
        before,
        after
    );
}
