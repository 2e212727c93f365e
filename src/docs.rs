use crate::api::attendance::{ScorePeriod, TeamDayQuery, TeamMonthQuery};
use crate::api::employee::{EmployeeListResponse, EmployeeQuery};
use crate::engine::calendar::CalendarKind;
use crate::engine::classify::{DayRecord, PresenceState};
use crate::engine::report::{
    DayStatus, MemberMonth, MemberMonthSummary, TeamDaySnapshot, TeamMemberDay, TeamMonthGrid,
};
use crate::engine::scoring::{MonthlyScore, ScoreBreakdown, ScoreStats};
use crate::engine::sessions::{DaySessions, SessionSlice};
use crate::model::employee::Employee;
use crate::model::session::{AttendanceSession, SessionType};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pointage API",
        version = "1.0.0",
        description = r#"
## Attendance reconciliation & scoring service

Turns raw half-day check-in/check-out sessions, approved leave and the
holiday calendar into derived attendance views.

### 🔹 Key Features
- **Monthly score**
  - Per-employee presence points, lateness penalties and streak bonuses
- **Team day snapshot**
  - Who is in, partial, or absent on a given date
- **Team month grid**
  - Daily presence cells plus per-employee summaries for a full month
- **Employee directory**
  - Read-side listing the team views are built from

### 📦 Response Format
- JSON-based RESTful responses
- Derived views are recomputed from the raw stores on every request

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::monthly_score,
        crate::api::attendance::team_day,
        crate::api::attendance::team_month,

        crate::api::employee::get_employee,
        crate::api::employee::list_employees
    ),
    components(
        schemas(
            AttendanceSession,
            SessionType,
            SessionSlice,
            DaySessions,
            CalendarKind,
            PresenceState,
            DayRecord,
            MonthlyScore,
            ScoreBreakdown,
            ScoreStats,
            ScorePeriod,
            DayStatus,
            TeamMemberDay,
            TeamDaySnapshot,
            TeamDayQuery,
            TeamMonthQuery,
            MemberMonth,
            MemberMonthSummary,
            TeamMonthGrid,
            Employee,
            EmployeeQuery,
            EmployeeListResponse
        )
    ),
    tags(
        (name = "Attendance", description = "Attendance reconciliation and scoring APIs"),
        (name = "Employee", description = "Employee directory APIs"),
    )
)]
pub struct ApiDoc;
