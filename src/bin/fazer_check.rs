use fazer::Agenda;
use fazer::config::AgendaConfig;
use fazer::core::calendar::chunk_rows;
use fazer::core::display::{day_heading, format_date_br, month_label};
use fazer::core::status::{TaskStatus, classify};

fn main() {
    let config = AgendaConfig::load();

    if let Err(e) = fazer::logging::init_logging(config.debug_logging) {
        eprintln!("Journal logging unavailable: {}", e);
    }

    let today = chrono::Local::now().date_naive();
    let agenda = Agenda::from_config(&config);
    let tasks = agenda.tasks();

    println!("=== {} ===", config.data_directory.display());
    println!(
        "{} tasks, {} notes, {} alerts\n",
        tasks.len(),
        agenda.notes().len(),
        agenda.alerts().len()
    );

    let cursor = fazer::core::calendar::MonthCursor::new(today);
    println!("{}", month_label(cursor.year(), cursor.month0(), config.locale));
    let busy = tasks.busy_days(cursor.year(), cursor.month0());
    for row in chunk_rows(&cursor.days(config.locale), 7) {
        let cells: Vec<String> = row
            .iter()
            .map(|d| {
                let mark = if busy.contains(&d.date) { '*' } else { ' ' };
                format!("{} {:>2}{}", d.weekday_label, d.day_of_month, mark)
            })
            .collect();
        println!("  {}", cells.join("  "));
    }

    let progress = tasks.day_progress(today);
    println!(
        "\n--- {} ({}/{} done) ---",
        day_heading(today, today),
        progress.done,
        progress.total
    );

    let view = tasks.today_view(today);
    if view.total_count() == 0 {
        println!("  Nothing scheduled.");
    }
    for task in view.tasks() {
        let marker = match classify(task, today) {
            TaskStatus::Done => "[x]",
            TaskStatus::Late => "[!]",
            TaskStatus::TodayPending | TaskStatus::Future => "[ ]",
        };
        println!(
            "  {} {} ({}, {})",
            marker,
            task.title,
            format_date_br(task.date),
            task.color_tag.as_keyword()
        );
    }

    println!("\nOverdue: {}", view.overdue.len());
    for alert in agenda.alerts().iter() {
        println!("Alert: {}", alert.text);
    }
}
