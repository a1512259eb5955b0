//! The provider's schedule: a month calendar and the appointments of the
//! selected day.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Timelike, Weekday};
use log::{debug, warn};

use crate::{
    context::AppContext,
    model::{Appointment, MonthAvailabilityItem, NewToast},
};

use super::RequestError;

const MONTHS: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

const WEEKDAYS: [&str; 7] = [
    "domingo",
    "segunda-feira",
    "terça-feira",
    "quarta-feira",
    "quinta-feira",
    "sexta-feira",
    "sábado",
];

const WEEKDAYS_SHORT: [&str; 7] = ["D", "S", "T", "Q", "Q", "S", "S"];

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct AppointmentView {
    pub id: String,
    pub hour_formatted: String,
    pub name: String,
    pub avatar_url: Option<String>,
}

impl From<&Appointment> for AppointmentView {
    fn from(appointment: &Appointment) -> Self {
        AppointmentView {
            id: appointment.id.clone(),
            hour_formatted: appointment.hour_formatted(),
            name: appointment.user.name.clone(),
            avatar_url: appointment.user.avatar_url.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct CalendarDay {
    pub day: u32,
    pub date: NaiveDate,
    pub disabled: bool,
    pub selected: bool,
    pub today: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Calendar {
    /// First day of the displayed month.
    pub month: NaiveDate,
    /// `YYYY-MM`
    pub month_key: String,
    pub title: String,
    pub weekdays: [&'static str; 7],
    /// Sunday first. `None` pads the first and last week.
    pub weeks: Vec<Vec<Option<CalendarDay>>>,
    /// `YYYY-MM`, absent while showing the current month.
    pub previous: Option<String>,
    pub next: String,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct DashboardView {
    pub selected_date: NaiveDate,
    /// `Dia 20 de maio`
    pub date_text: String,
    pub week_day: String,
    pub is_today: bool,
    /// Only when looking at today.
    pub next_appointment: Option<AppointmentView>,
    pub morning: Vec<AppointmentView>,
    pub afternoon: Vec<AppointmentView>,
    pub calendar: Calendar,
}

pub struct DashboardPage {
    ctx: AppContext,
}

impl DashboardPage {
    pub fn new(ctx: AppContext) -> DashboardPage {
        DashboardPage { ctx }
    }

    /// Build the dashboard for `selected` (defaults to today) showing
    /// `month` (defaults to the selected one).
    ///
    /// A selected date that can't be picked, a weekend or anything before
    /// the current month, falls back to today. Months before the current
    /// one are never shown.
    pub async fn load(
        &self,
        selected: Option<NaiveDate>,
        month: Option<NaiveDate>,
        now: DateTime<FixedOffset>,
    ) -> DashboardView {
        let today = now.date_naive();
        let current_month = first_of_month(today);

        let selected = match selected {
            Some(date) if is_weekday(date) && date >= current_month => date,
            Some(date) => {
                debug!("Can't select {}, showing today", date);
                today
            }
            None => today,
        };
        let month = month
            .map(first_of_month)
            .unwrap_or_else(|| first_of_month(selected))
            .max(current_month);

        let (availability, mut appointments) = match self.fetch(month, selected).await {
            Ok(loaded) => loaded,
            Err(err) => {
                warn!("Failed to load schedule for {}: {}", selected, err);
                self.ctx.toasts.add_toast(
                    NewToast::error("Erro ao carregar agenda")
                        .description("Não foi possível carregar seus agendamentos, tente novamente."),
                );
                (Vec::new(), Vec::new())
            }
        };
        appointments.sort_by_key(|appointment| appointment.date);

        let is_today = selected == today;
        let next_appointment = is_today
            .then(|| {
                appointments
                    .iter()
                    .find(|appointment| appointment.date > now)
                    .map(AppointmentView::from)
            })
            .flatten();

        let (morning, afternoon): (Vec<&Appointment>, Vec<&Appointment>) = appointments
            .iter()
            .partition(|appointment| appointment.date.hour() < 12);

        DashboardView {
            selected_date: selected,
            date_text: format!(
                "Dia {:02} de {}",
                selected.day(),
                MONTHS[selected.month0() as usize].to_lowercase()
            ),
            week_day: WEEKDAYS[selected.weekday().num_days_from_sunday() as usize].to_string(),
            is_today,
            next_appointment,
            morning: morning.into_iter().map(AppointmentView::from).collect(),
            afternoon: afternoon.into_iter().map(AppointmentView::from).collect(),
            calendar: calendar(month, selected, today, &availability),
        }
    }

    async fn fetch(
        &self,
        month: NaiveDate,
        selected: NaiveDate,
    ) -> Result<(Vec<MonthAvailabilityItem>, Vec<Appointment>), RequestError> {
        let user = self.ctx.session.user().ok_or(RequestError::SignedOut)?;

        let (availability, appointments) = futures::join!(
            self.ctx
                .api
                .month_availability(&user.id, month.year(), month.month()),
            self.ctx
                .api
                .my_appointments(selected.year(), selected.month(), selected.day()),
        );

        Ok((availability?, appointments?))
    }
}

fn calendar(
    month: NaiveDate,
    selected: NaiveDate,
    today: NaiveDate,
    availability: &[MonthAvailabilityItem],
) -> Calendar {
    let next = next_month(month);
    let days = (next - month).num_days() as u32;
    let current_month = first_of_month(today);

    let mut cells: Vec<Option<CalendarDay>> =
        vec![None; month.weekday().num_days_from_sunday() as usize];
    for day in 1..=days {
        let date = month + Duration::days(i64::from(day - 1));
        let unavailable = availability
            .iter()
            .any(|item| item.day == day && !item.available);

        cells.push(Some(CalendarDay {
            day,
            date,
            disabled: !is_weekday(date) || unavailable,
            selected: date == selected,
            today: date == today,
        }));
    }
    while cells.len() % 7 != 0 {
        cells.push(None);
    }

    let previous = (month > current_month).then(|| prev_month(month).format("%Y-%m").to_string());

    Calendar {
        month,
        month_key: month.format("%Y-%m").to_string(),
        title: format!("{} {}", MONTHS[month.month0() as usize], month.year()),
        weekdays: WEEKDAYS_SHORT,
        weeks: cells.chunks(7).map(<[_]>::to_vec).collect(),
        previous,
        next: next.format("%Y-%m").to_string(),
    }
}

fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

fn next_month(first: NaiveDate) -> NaiveDate {
    first_of_month(first + Duration::days(32))
}

fn prev_month(first: NaiveDate) -> NaiveDate {
    first_of_month(first - Duration::days(1))
}
