use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StudentStatus {
    #[default]
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: u32,
    pub name: String,
    pub age: u8,
    pub guardian: String,
    pub phone: String,
    #[serde(default)]
    pub status: StudentStatus,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub class_id: Option<u32>,
    #[serde(default)]
    pub monthly_fee: Decimal,
    #[serde(default)]
    pub social_program: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Class {
    pub id: u32,
    pub name: String,
    pub category: String,
    pub schedule: String,
    pub location: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attendance {
    pub id: u32,
    pub date: NaiveDate,
    pub present: bool,
    pub student_id: u32,
    pub class_id: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: u32,
    /// First day of the month the payment refers to.
    pub competence: NaiveDate,
    pub paid: bool,
    #[serde(default)]
    pub paid_on: Option<NaiveDate>,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub amount: Decimal,
    pub student_id: u32,
}

/// Read-only copy of the program's records, exported by the persistence side.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Records {
    pub students: Vec<Student>,
    pub classes: Vec<Class>,
    pub attendance: Vec<Attendance>,
    pub payments: Vec<Payment>,
}

impl Records {
    pub fn class_name(&self, class_id: Option<u32>) -> Option<&str> {
        let class_id = class_id?;
        self.classes
            .iter()
            .find(|class| class.id == class_id)
            .map(|class| class.name.as_str())
    }

    pub fn student(&self, id: u32) -> Option<&Student> {
        self.students.iter().find(|student| student.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub month: NaiveDate,
    pub month_short: String,
    pub present: u32,
    pub paid: u32,
    /// Bar heights relative to the busiest month, floored so empty months stay visible.
    pub present_pct: u32,
    pub paid_pct: u32,
}

/// Series handed to the dashboard chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ChartData {
    pub points: Vec<ChartPoint>,
}

impl ChartData {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentLine {
    pub student_id: u32,
    pub student: String,
    pub competence: NaiveDate,
    pub due_date: NaiveDate,
    pub amount: Decimal,
    pub paid: bool,
    pub paid_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentSummary {
    pub month: NaiveDate,
    pub paid: usize,
    pub pending: usize,
    pub percentage: f64,
    pub expected: Decimal,
    pub received: Decimal,
    pub outstanding: Decimal,
    pub expected_display: String,
    pub received_display: String,
    pub outstanding_display: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyPayments {
    pub summary: PaymentSummary,
    pub lines: Vec<PaymentLine>,
}

/// Month view of `GET /api/payments`: the month plus the latest unpaid entries
/// from any month.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentsResponse {
    #[serde(flatten)]
    pub month: MonthlyPayments,
    pub recent_pending: Vec<PendingPayment>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PendingPayment {
    pub student: String,
    pub class: String,
    /// `MM/YYYY`.
    pub month: String,
    pub amount: Decimal,
    pub amount_display: String,
}

/// Unpaid entry placed against its due date. `days` counts down to the due
/// date for upcoming entries and counts days late for overdue ones.
#[derive(Debug, Clone, Serialize)]
pub struct DuePayment {
    pub student: String,
    pub class: String,
    pub competence: NaiveDate,
    pub due_date: NaiveDate,
    pub days: i64,
    pub amount: Decimal,
    pub amount_display: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
    pub student: String,
    pub class: String,
    pub competence: NaiveDate,
    pub paid_on: NaiveDate,
    pub amount: Decimal,
    pub amount_display: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SocialProgramStudent {
    pub id: u32,
    pub name: String,
    pub class: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FinanceOverview {
    pub month: PaymentSummary,
    pub due_this_week: Vec<DuePayment>,
    pub overdue: Vec<DuePayment>,
    /// Oldest month first.
    pub history: Vec<PaymentSummary>,
    pub recent_receipts: Vec<Receipt>,
    pub social_program: Vec<SocialProgramStudent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Birthday {
    pub name: String,
    pub date: NaiveDate,
    pub days_until: i64,
    pub class: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceSummary {
    pub records: usize,
    pub present: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    pub month: NaiveDate,
    pub students_total: usize,
    pub students_active: usize,
    pub students_inactive: usize,
    pub classes_total: usize,
    pub classes_empty: usize,
    pub social_program: usize,
    pub payments: PaymentSummary,
    pub pending_payments: Vec<PendingPayment>,
    pub attendance: AttendanceSummary,
    pub birthdays: Vec<Birthday>,
    pub chart: ChartData,
}

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub month: Option<String>,
}
