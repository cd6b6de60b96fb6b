use crate::models::{
    AttendanceSummary, Birthday, ChartData, ChartPoint, DashboardResponse, DuePayment,
    FinanceOverview, MonthlyPayments, Payment, PaymentLine, PaymentSummary, PendingPayment,
    Receipt, Records, SocialProgramStudent, Student, StudentStatus,
};
use chrono::{Datelike, Local, Months, NaiveDate};
use rust_decimal::Decimal;

pub const CHART_MONTHS: u32 = 6;
pub const DEFAULT_DUE_DAY: u32 = 10;
const CHART_MIN_PCT: u32 = 16;
const BIRTHDAY_WINDOW_DAYS: i64 = 45;
const BIRTHDAY_LIMIT: usize = 6;
const PENDING_LIMIT: usize = 5;
pub const PAYMENTS_PENDING_LIMIT: usize = 8;
const RECEIPTS_LIMIT: usize = 8;
const DUE_SOON_DAYS: i64 = 7;
const UNASSIGNED_CLASS: &str = "No class";

pub fn build_dashboard(records: &Records) -> DashboardResponse {
    build_dashboard_at(Local::now().date_naive(), records)
}

pub fn build_dashboard_at(today: NaiveDate, records: &Records) -> DashboardResponse {
    let month = first_day_of_month(today);
    let active = records
        .students
        .iter()
        .filter(|student| student.status == StudentStatus::Active)
        .count();
    let classes_empty = records
        .classes
        .iter()
        .filter(|class| {
            !records
                .students
                .iter()
                .any(|student| student.class_id == Some(class.id))
        })
        .count();

    DashboardResponse {
        month,
        students_total: records.students.len(),
        students_active: active,
        students_inactive: records.students.len() - active,
        classes_total: records.classes.len(),
        classes_empty,
        social_program: records
            .students
            .iter()
            .filter(|student| student.social_program)
            .count(),
        payments: monthly_payments(month, records).summary,
        pending_payments: pending_payments(records, PENDING_LIMIT),
        attendance: attendance_summary(month, records),
        birthdays: upcoming_birthdays_at(today, records),
        chart: build_chart_data_at(today, records, CHART_MONTHS),
    }
}

/// Present attendances and paid payments per month for the `months` months
/// ending with the current one. Percentages are relative to the largest
/// count in the window and never drop below 16.
pub fn build_chart_data_at(today: NaiveDate, records: &Records, months: u32) -> ChartData {
    let current = first_day_of_month(today);
    let start = current - Months::new(months.saturating_sub(1));

    let mut counts = Vec::with_capacity(months as usize);
    let mut max_value = 1u32;
    for offset in 0..months {
        let month = start + Months::new(offset);
        let present = records
            .attendance
            .iter()
            .filter(|record| record.present && same_month(record.date, month))
            .count() as u32;
        let paid = records
            .payments
            .iter()
            .filter(|payment| payment.paid && same_month(payment.competence, month))
            .count() as u32;
        max_value = max_value.max(present).max(paid);
        counts.push((month, present, paid));
    }

    let points = counts
        .into_iter()
        .map(|(month, present, paid)| ChartPoint {
            month,
            month_short: month.format("%b").to_string(),
            present,
            paid,
            present_pct: bar_pct(present, max_value),
            paid_pct: bar_pct(paid, max_value),
        })
        .collect();
    ChartData { points }
}

fn bar_pct(value: u32, max_value: u32) -> u32 {
    (value * 100 / max_value.max(1)).max(CHART_MIN_PCT)
}

/// Payment status of every fee-paying student for `month`, sorted by name.
/// Students without a payment record count as pending for their current fee;
/// social-program students are left out.
pub fn monthly_payments(month: NaiveDate, records: &Records) -> MonthlyPayments {
    let month = first_day_of_month(month);
    let mut students: Vec<_> = records
        .students
        .iter()
        .filter(|student| !student.social_program)
        .collect();
    students.sort_by(|a, b| a.name.cmp(&b.name));

    let lines: Vec<PaymentLine> = students
        .into_iter()
        .map(|student| {
            let payment = records
                .payments
                .iter()
                .find(|payment| payment.student_id == student.id && payment.competence == month);
            PaymentLine {
                student_id: student.id,
                student: student.name.clone(),
                competence: month,
                due_date: due_date(month, DEFAULT_DUE_DAY),
                amount: student.monthly_fee.round_dp(2),
                paid: payment.is_some_and(|payment| payment.paid),
                paid_on: payment.and_then(|payment| payment.paid_on),
            }
        })
        .collect();

    let paid = lines.iter().filter(|line| line.paid).count();
    let expected: Decimal = lines.iter().map(|line| line.amount).sum();
    let received: Decimal = lines
        .iter()
        .filter(|line| line.paid)
        .map(|line| line.amount)
        .sum();
    let outstanding = expected - received;

    MonthlyPayments {
        summary: PaymentSummary {
            month,
            paid,
            pending: lines.len() - paid,
            percentage: percentage(paid, lines.len()),
            expected,
            received,
            outstanding,
            expected_display: format_currency(expected),
            received_display: format_currency(received),
            outstanding_display: format_currency(outstanding),
        },
        lines,
    }
}

/// Summaries for the `months` months ending with `today`'s, oldest first.
pub fn payment_history_at(today: NaiveDate, records: &Records, months: u32) -> Vec<PaymentSummary> {
    let current = first_day_of_month(today);
    (0..months)
        .rev()
        .map(|offset| monthly_payments(current - Months::new(offset), records).summary)
        .collect()
}

pub fn build_finance(records: &Records) -> FinanceOverview {
    build_finance_at(Local::now().date_naive(), records)
}

pub fn build_finance_at(today: NaiveDate, records: &Records) -> FinanceOverview {
    FinanceOverview {
        month: monthly_payments(today, records).summary,
        due_this_week: due_this_week_at(today, records),
        overdue: overdue_at(today, records),
        history: payment_history_at(today, records, CHART_MONTHS),
        recent_receipts: recent_receipts(records, RECEIPTS_LIMIT),
        social_program: social_program_roster(records),
    }
}

/// Unpaid entries due between today and a week from now, soonest first.
pub fn due_this_week_at(today: NaiveDate, records: &Records) -> Vec<DuePayment> {
    let mut due: Vec<_> = unpaid_by_due_date(today, records)
        .into_iter()
        .filter(|entry| (0..=DUE_SOON_DAYS).contains(&entry.days))
        .collect();
    due.sort_by_key(|entry| entry.days);
    due
}

/// Unpaid entries past their due date, most days late first. `days` is the
/// number of days late.
pub fn overdue_at(today: NaiveDate, records: &Records) -> Vec<DuePayment> {
    let mut overdue: Vec<_> = unpaid_by_due_date(today, records)
        .into_iter()
        .filter(|entry| entry.days < 0)
        .map(|entry| DuePayment {
            days: -entry.days,
            ..entry
        })
        .collect();
    overdue.sort_by(|a, b| b.days.cmp(&a.days));
    overdue
}

/// Every unpaid entry with `days` until its due date (negative when past),
/// oldest competence first.
fn unpaid_by_due_date(today: NaiveDate, records: &Records) -> Vec<DuePayment> {
    let mut unpaid: Vec<(&Payment, &Student)> = records
        .payments
        .iter()
        .filter(|payment| !payment.paid)
        .filter_map(|payment| Some((payment, records.student(payment.student_id)?)))
        .collect();
    unpaid.sort_by_key(|(payment, _)| payment.competence);

    unpaid
        .into_iter()
        .map(|(payment, student)| {
            let due = due_date(payment.competence, DEFAULT_DUE_DAY);
            DuePayment {
                student: student.name.clone(),
                class: class_label(records, student),
                competence: payment.competence,
                due_date: due,
                days: (due - today).num_days(),
                amount: payment.amount.round_dp(2),
                amount_display: format_currency(payment.amount),
            }
        })
        .collect()
}

/// Latest paid entries with a payment date, fee-paying students only.
pub fn recent_receipts(records: &Records, limit: usize) -> Vec<Receipt> {
    let mut paid: Vec<(&Payment, NaiveDate, &Student)> = records
        .payments
        .iter()
        .filter(|payment| payment.paid)
        .filter_map(|payment| {
            let paid_on = payment.paid_on?;
            let student = records.student(payment.student_id)?;
            (!student.social_program).then_some((payment, paid_on, student))
        })
        .collect();
    paid.sort_by(|a, b| b.1.cmp(&a.1));

    paid.into_iter()
        .take(limit)
        .map(|(payment, paid_on, student)| Receipt {
            student: student.name.clone(),
            class: class_label(records, student),
            competence: payment.competence,
            paid_on,
            amount: payment.amount.round_dp(2),
            amount_display: format_currency(payment.amount),
        })
        .collect()
}

pub fn social_program_roster(records: &Records) -> Vec<SocialProgramStudent> {
    let mut roster: Vec<_> = records
        .students
        .iter()
        .filter(|student| student.social_program)
        .map(|student| SocialProgramStudent {
            id: student.id,
            name: student.name.clone(),
            class: class_label(records, student),
        })
        .collect();
    roster.sort_by(|a, b| a.name.cmp(&b.name));
    roster
}

fn class_label(records: &Records, student: &Student) -> String {
    records
        .class_name(student.class_id)
        .unwrap_or(UNASSIGNED_CLASS)
        .to_string()
}

/// Unpaid payment records of fee-paying students, most recent month first.
pub fn pending_payments(records: &Records, limit: usize) -> Vec<PendingPayment> {
    let mut pending: Vec<_> = records
        .payments
        .iter()
        .filter(|payment| !payment.paid)
        .filter_map(|payment| {
            let student = records.student(payment.student_id)?;
            (!student.social_program).then_some((payment, student))
        })
        .collect();
    pending.sort_by(|a, b| b.0.competence.cmp(&a.0.competence));

    pending
        .into_iter()
        .take(limit)
        .map(|(payment, student)| PendingPayment {
            student: student.name.clone(),
            class: records
                .class_name(student.class_id)
                .unwrap_or(UNASSIGNED_CLASS)
                .to_string(),
            month: payment.competence.format("%m/%Y").to_string(),
            amount: payment.amount.round_dp(2),
            amount_display: format_currency(payment.amount),
        })
        .collect()
}

pub fn attendance_summary(month: NaiveDate, records: &Records) -> AttendanceSummary {
    let month = first_day_of_month(month);
    let in_month: Vec<_> = records
        .attendance
        .iter()
        .filter(|record| same_month(record.date, month))
        .collect();
    let present = in_month.iter().filter(|record| record.present).count();
    AttendanceSummary {
        records: in_month.len(),
        present,
        percentage: percentage(present, in_month.len()),
    }
}

/// Students whose next birthday falls within 45 days, soonest first, at most six.
pub fn upcoming_birthdays_at(today: NaiveDate, records: &Records) -> Vec<Birthday> {
    let mut upcoming: Vec<Birthday> = records
        .students
        .iter()
        .filter_map(|student| {
            let birth = student.birth_date?;
            let days_until = days_until_birthday(birth, today);
            (days_until <= BIRTHDAY_WINDOW_DAYS).then(|| Birthday {
                name: student.name.clone(),
                date: birth,
                days_until,
                class: records
                    .class_name(student.class_id)
                    .unwrap_or(UNASSIGNED_CLASS)
                    .to_string(),
            })
        })
        .collect();
    upcoming.sort_by_key(|birthday| birthday.days_until);
    upcoming.truncate(BIRTHDAY_LIMIT);
    upcoming
}

/// Days from `today` to the next anniversary of `birth` (0 on the day).
/// February 29 birthdays fall on February 28 in common years.
pub fn days_until_birthday(birth: NaiveDate, today: NaiveDate) -> i64 {
    let this_year = anniversary(birth, today.year());
    let next = if this_year < today {
        anniversary(birth, today.year() + 1)
    } else {
        this_year
    };
    (next - today).num_days()
}

fn anniversary(birth: NaiveDate, year: i32) -> NaiveDate {
    birth
        .with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, birth.month(), 28))
        .unwrap_or(birth)
}

/// Due date inside the competence month, clamped to the month's last day.
pub fn due_date(competence: NaiveDate, due_day: u32) -> NaiveDate {
    let month = first_day_of_month(competence);
    let last_day = (month + Months::new(1)).pred_opt().map_or(28, |last| last.day());
    month
        .with_day(due_day.clamp(1, last_day))
        .unwrap_or(month)
}

pub fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Parses `YYYY-MM`; anything else falls back to the month of `today`.
pub fn parse_month(value: Option<&str>, today: NaiveDate) -> NaiveDate {
    value
        .and_then(try_parse_month)
        .unwrap_or_else(|| first_day_of_month(today))
}

pub fn try_parse_month(raw: &str) -> Option<NaiveDate> {
    let (year, month) = raw.trim().split_once('-')?;
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)
}

/// Brazilian real formatting: `R$ 1.234,56`.
pub fn format_currency(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let plain = format!("{:.2}", rounded.abs());
    let (units, cents) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (index, digit) in units.chars().enumerate() {
        if index > 0 && (units.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if negative { "-" } else { "" };
    format!("R$ {sign}{grouped},{cents}")
}

fn same_month(date: NaiveDate, month: NaiveDate) -> bool {
    date.year() == month.year() && date.month() == month.month()
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 1000.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Attendance, Class, Payment, Student};
    use rust_decimal_macros::dec;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn student(id: u32, name: &str, fee: Decimal, social: bool) -> Student {
        Student {
            id,
            name: name.to_string(),
            age: 10,
            guardian: "Responsável".to_string(),
            phone: "(11) 99999-0000".to_string(),
            status: StudentStatus::Active,
            notes: String::new(),
            birth_date: None,
            class_id: Some(1),
            monthly_fee: fee,
            social_program: social,
        }
    }

    fn payment(id: u32, student_id: u32, competence: NaiveDate, paid: bool, amount: Decimal) -> Payment {
        Payment {
            id,
            competence,
            paid,
            paid_on: paid.then_some(competence),
            note: String::new(),
            amount,
            student_id,
        }
    }

    fn records() -> Records {
        Records {
            students: vec![
                student(1, "Bruno Costa", dec!(120.00), false),
                student(2, "Ana Silva", dec!(95.50), false),
                student(3, "Carla Dias", dec!(120.00), true),
            ],
            classes: vec![
                Class {
                    id: 1,
                    name: "Sub-11".into(),
                    category: "Futsal".into(),
                    schedule: "Seg/Qua 18h".into(),
                    location: "Quadra 1".into(),
                },
                Class {
                    id: 2,
                    name: "Sub-15".into(),
                    category: "Futsal".into(),
                    schedule: "Sáb 9h".into(),
                    location: "Quadra 2".into(),
                },
            ],
            attendance: vec![
                Attendance { id: 1, date: ymd(2026, 5, 4), present: true, student_id: 1, class_id: 1 },
                Attendance { id: 2, date: ymd(2026, 5, 6), present: false, student_id: 2, class_id: 1 },
                Attendance { id: 3, date: ymd(2026, 4, 6), present: true, student_id: 2, class_id: 1 },
            ],
            payments: vec![
                payment(1, 1, ymd(2026, 5, 1), true, dec!(120.00)),
                payment(2, 2, ymd(2026, 4, 1), false, dec!(95.50)),
                payment(3, 3, ymd(2026, 5, 1), false, dec!(120.00)),
            ],
        }
    }

    #[test]
    fn monthly_payments_skip_social_program_and_default_to_pending() {
        let month = monthly_payments(ymd(2026, 5, 17), &records());
        let names: Vec<_> = month.lines.iter().map(|line| line.student.as_str()).collect();
        assert_eq!(names, vec!["Ana Silva", "Bruno Costa"]);

        let summary = month.summary;
        assert_eq!(summary.month, ymd(2026, 5, 1));
        assert_eq!(summary.paid, 1);
        assert_eq!(summary.pending, 1);
        assert_eq!(summary.percentage, 50.0);
        assert_eq!(summary.expected, dec!(215.50));
        assert_eq!(summary.received, dec!(120.00));
        assert_eq!(summary.outstanding, dec!(95.50));
        assert_eq!(summary.expected_display, "R$ 215,50");
        assert_eq!(month.lines[0].due_date, ymd(2026, 5, 10));
    }

    #[test]
    fn chart_covers_six_months_with_floor_percentages() {
        let chart = build_chart_data_at(ymd(2026, 5, 20), &records(), CHART_MONTHS);
        assert_eq!(chart.points.len(), 6);
        assert_eq!(chart.points[0].month, ymd(2025, 12, 1));
        assert_eq!(chart.points[0].month_short, "Dec");

        let may = chart.points.last().unwrap();
        assert_eq!(may.month, ymd(2026, 5, 1));
        assert_eq!(may.present, 1);
        assert_eq!(may.paid, 1);
        assert_eq!(may.present_pct, 100);
        assert_eq!(chart.points[0].present_pct, CHART_MIN_PCT);
    }

    #[test]
    fn pending_payments_are_newest_first_without_social_students() {
        let pending = pending_payments(&records(), PENDING_LIMIT);
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].student, "Ana Silva");
        assert_eq!(pending[0].month, "04/2026");
        assert_eq!(pending[0].class, "Sub-11");
        assert_eq!(pending[0].amount_display, "R$ 95,50");
    }

    #[test]
    fn dashboard_counts_records() {
        let dashboard = build_dashboard_at(ymd(2026, 5, 20), &records());
        assert_eq!(dashboard.students_total, 3);
        assert_eq!(dashboard.students_active, 3);
        assert_eq!(dashboard.classes_total, 2);
        assert_eq!(dashboard.classes_empty, 1);
        assert_eq!(dashboard.social_program, 1);
        assert_eq!(dashboard.attendance.records, 2);
        assert_eq!(dashboard.attendance.present, 1);
        assert_eq!(dashboard.attendance.percentage, 50.0);
    }

    #[test]
    fn birthdays_within_window_sorted() {
        let mut data = records();
        data.students[0].birth_date = Some(ymd(2015, 6, 10));
        data.students[1].birth_date = Some(ymd(2016, 5, 25));
        data.students[2].birth_date = Some(ymd(2014, 1, 2));

        let birthdays = upcoming_birthdays_at(ymd(2026, 5, 20), &data);
        let names: Vec<_> = birthdays.iter().map(|b| (b.name.as_str(), b.days_until)).collect();
        assert_eq!(names, vec![("Ana Silva", 5), ("Bruno Costa", 21)]);
    }

    #[test]
    fn birthday_today_and_leap_day() {
        assert_eq!(days_until_birthday(ymd(2016, 5, 20), ymd(2026, 5, 20)), 0);
        assert_eq!(days_until_birthday(ymd(2016, 5, 19), ymd(2026, 5, 20)), 364);
        assert_eq!(days_until_birthday(ymd(2012, 2, 29), ymd(2026, 2, 1)), 27);
    }

    #[test]
    fn due_date_clamps_to_month_end() {
        assert_eq!(due_date(ymd(2026, 2, 1), 31), ymd(2026, 2, 28));
        assert_eq!(due_date(ymd(2026, 4, 1), DEFAULT_DUE_DAY), ymd(2026, 4, 10));
    }

    #[test]
    fn parse_month_falls_back_to_current() {
        let today = ymd(2026, 7, 14);
        assert_eq!(parse_month(Some("2025-11"), today), ymd(2025, 11, 1));
        assert_eq!(parse_month(Some("2025-13"), today), ymd(2026, 7, 1));
        assert_eq!(parse_month(Some("garbage"), today), ymd(2026, 7, 1));
        assert_eq!(parse_month(None, today), ymd(2026, 7, 1));
    }

    #[test]
    fn payment_history_runs_oldest_to_newest() {
        let history = payment_history_at(ymd(2026, 5, 20), &records(), CHART_MONTHS);
        let months: Vec<_> = history.iter().map(|summary| summary.month).collect();
        assert_eq!(months.first(), Some(&ymd(2025, 12, 1)));
        assert_eq!(months.last(), Some(&ymd(2026, 5, 1)));
        assert!(months.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn due_this_week_includes_both_boundaries() {
        let data = records();

        let week_out = due_this_week_at(ymd(2026, 5, 3), &data);
        assert_eq!(week_out.len(), 1);
        assert_eq!(week_out[0].student, "Carla Dias");
        assert_eq!(week_out[0].due_date, ymd(2026, 5, 10));
        assert_eq!(week_out[0].days, 7);

        let due_today = due_this_week_at(ymd(2026, 5, 10), &data);
        assert_eq!(due_today.len(), 1);
        assert_eq!(due_today[0].days, 0);

        assert!(due_this_week_at(ymd(2026, 5, 2), &data).is_empty());
    }

    #[test]
    fn overdue_is_most_days_late_first() {
        let mut data = records();
        data.payments.push(payment(4, 1, ymd(2026, 3, 1), false, dec!(120.00)));

        let overdue = overdue_at(ymd(2026, 5, 11), &data);
        let late: Vec<_> = overdue
            .iter()
            .map(|entry| (entry.student.as_str(), entry.days))
            .collect();
        assert_eq!(
            late,
            vec![("Bruno Costa", 62), ("Ana Silva", 31), ("Carla Dias", 1)]
        );
        assert!(due_this_week_at(ymd(2026, 5, 11), &data).is_empty());
    }

    #[test]
    fn recent_receipts_need_a_payment_date_and_skip_social_program() {
        let mut data = records();
        data.payments.push(payment(4, 2, ymd(2026, 3, 1), true, dec!(95.50)));
        data.payments.push(payment(5, 3, ymd(2026, 4, 1), true, dec!(120.00)));
        let mut undated = payment(6, 1, ymd(2026, 4, 1), true, dec!(120.00));
        undated.paid_on = None;
        data.payments.push(undated);

        let receipts = recent_receipts(&data, RECEIPTS_LIMIT);
        let paid: Vec<_> = receipts
            .iter()
            .map(|receipt| (receipt.student.as_str(), receipt.paid_on))
            .collect();
        assert_eq!(
            paid,
            vec![("Bruno Costa", ymd(2026, 5, 1)), ("Ana Silva", ymd(2026, 3, 1))]
        );
        assert_eq!(receipts[0].amount_display, "R$ 120,00");
    }

    #[test]
    fn finance_overview_lists_social_program_by_name() {
        let mut data = records();
        data.students.push(student(4, "Abel Lima", dec!(0), true));

        let finance = build_finance_at(ymd(2026, 5, 20), &data);
        let roster: Vec<_> = finance
            .social_program
            .iter()
            .map(|student| student.name.as_str())
            .collect();
        assert_eq!(roster, vec!["Abel Lima", "Carla Dias"]);
        assert_eq!(finance.social_program[0].class, "Sub-11");
        assert_eq!(finance.month.month, ymd(2026, 5, 1));
        assert_eq!(finance.history.len(), 6);
    }

    #[test]
    fn currency_uses_brazilian_separators() {
        assert_eq!(format_currency(dec!(0)), "R$ 0,00");
        assert_eq!(format_currency(dec!(95.5)), "R$ 95,50");
        assert_eq!(format_currency(dec!(1234567.891)), "R$ 1.234.567,89");
        assert_eq!(format_currency(dec!(-1200)), "R$ -1.200,00");
    }
}
