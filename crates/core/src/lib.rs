// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! recur-core: Domain types for the recurring-job reconciler

pub mod clock;
pub mod id;
pub mod instance;
pub mod key;
pub mod meta;
pub mod owner;
pub mod schedule;
pub mod scheduled_time;
pub mod time_fmt;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, FakeClock, SystemClock};
pub use id::{IdGen, SequentialIdGen, UuidIdGen};
pub use instance::{
    Completion, ConditionKind, ConditionStatus, InstanceCondition, InstanceRef, InstanceStatus,
    JobInstance, INSTANCE_API_VERSION, INSTANCE_KIND,
};
pub use key::ObjectKey;
pub use meta::ObjectMeta;
pub use owner::{owner_index_key, OwnerRef};
pub use schedule::{
    ConcurrencyPolicy, InstanceTemplate, Schedule, ScheduleSpec, ScheduleStatus,
    SCHEDULE_API_VERSION, SCHEDULE_KIND,
};
pub use scheduled_time::{
    format_scheduled_time, instance_name, parse_scheduled_time, ScheduledTimeError,
    SCHEDULED_AT_ANNOTATION,
};
pub use time_fmt::format_duration;
