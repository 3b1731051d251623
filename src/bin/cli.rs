use chrono::NaiveDate;
use result_dashboard::{
    Dashboard, DashboardConfig, DashboardError, LeaderboardEntry, SessionState,
    SqliteStudentStore, StudentForm, StudentRecord, TimelineKind,
};
use std::io::{self, Write};
use std::str::FromStr;

fn render_row(widths: &[usize], cells: &[&str]) -> String {
    let mut line = String::from("|");
    for (ci, cell) in cells.iter().enumerate() {
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(widths[ci].saturating_sub(cell.len())));
        line.push_str(" |");
    }
    line
}

fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (ci, cell) in row.iter().enumerate() {
            if cell.len() > widths[ci] {
                widths[ci] = cell.len();
            }
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&widths, headers));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push_str(&render_row(&widths, &cells));
        out.push('\n');
    }
    out.push_str(&sep);
    out
}

fn render_students(students: &[StudentRecord]) -> String {
    let rows: Vec<Vec<String>> = students
        .iter()
        .map(|s| {
            vec![
                s.roll_no.to_string(),
                s.name.clone(),
                s.bangla_marks.to_string(),
                s.english_marks.to_string(),
                s.math_marks.to_string(),
                s.science_marks.to_string(),
                s.total_marks.to_string(),
                s.grade.to_string(),
            ]
        })
        .collect();
    render_table(
        &[
            "roll_no", "name", "bangla", "english", "math", "science", "total", "grade",
        ],
        &rows,
    )
}

fn render_leaderboard(entries: &[LeaderboardEntry]) -> String {
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|e| {
            vec![
                e.rank.to_string(),
                e.roll_no.to_string(),
                e.name.clone(),
                e.total_marks.to_string(),
                e.average.to_string(),
                e.grade.to_string(),
            ]
        })
        .collect();
    render_table(
        &["rank", "roll_no", "name", "total", "average", "grade"],
        &rows,
    )
}

fn report_error(err: &DashboardError) {
    match err {
        DashboardError::Validation(inner) => {
            println!("Please enter valid numbers for marks and roll. ({inner})")
        }
        DashboardError::InvalidCredentials => println!("Invalid credentials!"),
        DashboardError::Unauthorized => println!("Teacher login required."),
        DashboardError::NotFound(roll) => println!("Roll number {roll} not found."),
        DashboardError::Conflict(roll) => println!("Roll number {roll} already exists."),
        other => println!("An error occurred: {other}"),
    }
}

fn parse_limit(token: Option<&str>) -> Result<Option<usize>, ()> {
    match token {
        None => Ok(None),
        Some(raw) => raw.parse::<usize>().map(Some).map_err(|_| ()),
    }
}

fn print_help() {
    println!(
        "Commands:\n  help                                        Show this help\n  login <username> <password>                 Teacher login\n  logout                                      Teacher logout\n  add <roll> <bangla> <english> <math> <science> <name...>\n                                              Add a student result\n  list                                        Show all students\n  result <roll>                               Look up a result (no login needed)\n  delete <roll>                               Delete a student\n  top [n]                                     Top performers (default from config)\n  leaderboard [n]                             Ranked leaderboard with per-student average\n  rank <roll>                                 Position of a student by total\n  averages                                    Per-subject averages\n  grades                                      Grade distribution\n  export <path>                               Write all students to CSV\n  timeline add <exam|homework> [YYYY-MM-DD] <title...>\n                                              Add a timeline event (date defaults to today)\n  timeline list                               Show timeline, newest first\n  quit|exit                                   Exit"
    );
}

fn main() {
    result_dashboard::init_tracing();

    let config = match DashboardConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };
    let store = match SqliteStudentStore::new(config.database_path()) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Could not open {}: {e}", config.database_path().display());
            std::process::exit(1);
        }
    };
    let dashboard = Dashboard::from_config(store, &config);
    let mut session = SessionState::new();

    println!("Student Result Management (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "login" => match (parts.next(), parts.next()) {
                (Some(username), Some(password)) => {
                    match dashboard.login(&mut session, username, password) {
                        Ok(()) => println!("Logged in."),
                        Err(e) => report_error(&e),
                    }
                }
                _ => println!("Usage: login <username> <password>"),
            },
            "logout" => {
                dashboard.logout(&mut session);
                println!("Logged out.");
            }
            "add" => {
                let fields: Vec<&str> = parts.by_ref().take(5).collect();
                let name = parts.collect::<Vec<_>>().join(" ");
                if fields.len() < 5 {
                    println!("Usage: add <roll> <bangla> <english> <math> <science> <name...>");
                    continue;
                }
                let form = StudentForm {
                    name,
                    roll_no: fields[0].to_string(),
                    bangla: fields[1].to_string(),
                    english: fields[2].to_string(),
                    math: fields[3].to_string(),
                    science: fields[4].to_string(),
                };
                match dashboard.add_student(&session, &form) {
                    Ok(record) => {
                        println!("Student added successfully!");
                        println!("{}", render_students(std::slice::from_ref(&record)));
                    }
                    Err(e) => report_error(&e),
                }
            }
            "list" => match dashboard.student_listing(&session) {
                Ok(listing) => {
                    if !listing.store_available {
                        println!("Student store unavailable; showing no students.");
                    }
                    println!("{}", render_students(&listing.students));
                }
                Err(e) => report_error(&e),
            },
            "result" => match parts.next() {
                Some(raw) => match dashboard.search_result(raw) {
                    Ok(record) => println!("{}", render_students(std::slice::from_ref(&record))),
                    Err(DashboardError::NotFound(_)) => println!("Roll number not found."),
                    Err(DashboardError::Validation(_)) => {
                        println!("Please enter a valid roll number.")
                    }
                    Err(e) => report_error(&e),
                },
                None => println!("Usage: result <roll>"),
            },
            "delete" => match parts.next().map(str::parse::<i64>) {
                Some(Ok(roll)) => match dashboard.delete_student(&session, roll) {
                    Ok(()) => println!("Deleted student {roll}."),
                    Err(e) => report_error(&e),
                },
                Some(Err(_)) => println!("Invalid roll number"),
                None => println!("Usage: delete <roll>"),
            },
            "top" => match parse_limit(parts.next()) {
                Ok(n) => match dashboard.top_performers(&session, n) {
                    Ok(students) => println!("{}", render_students(&students)),
                    Err(e) => report_error(&e),
                },
                Err(()) => println!("Usage: top [n]"),
            },
            "leaderboard" => match parse_limit(parts.next()) {
                Ok(n) => match dashboard.leaderboard(&session, n) {
                    Ok(entries) => println!("{}", render_leaderboard(&entries)),
                    Err(e) => report_error(&e),
                },
                Err(()) => println!("Usage: leaderboard [n]"),
            },
            "rank" => match parts.next().map(str::parse::<i64>) {
                Some(Ok(roll)) => match dashboard.rank(&session, roll) {
                    Ok(rank) => println!("Roll {roll} is ranked #{rank}."),
                    Err(e) => report_error(&e),
                },
                Some(Err(_)) => println!("Invalid roll number"),
                None => println!("Usage: rank <roll>"),
            },
            "averages" => match dashboard.subject_averages(&session) {
                Ok(averages) => {
                    for (subject, avg) in averages {
                        println!("  {:<8} {}", subject, avg);
                    }
                }
                Err(e) => report_error(&e),
            },
            "grades" => match dashboard.grade_distribution(&session) {
                Ok(distribution) => {
                    for (grade, count) in distribution {
                        println!("  {:<5} {}", grade, count);
                    }
                }
                Err(e) => report_error(&e),
            },
            "export" => match parts.next() {
                Some(path) => {
                    // Buffer first so a refused export leaves an existing file alone.
                    let mut buffer = Vec::new();
                    let result = dashboard.export_csv(&session, &mut buffer).and_then(|rows| {
                        std::fs::write(path, &buffer)
                            .map(|()| rows)
                            .map_err(|e| DashboardError::Export(e.into()))
                    });
                    match result {
                        Ok(rows) => println!("Exported {rows} students to {path}."),
                        Err(e) => report_error(&e),
                    }
                }
                None => println!("Usage: export <path>"),
            },
            "timeline" => match parts.next() {
                Some("list") => match dashboard.timeline(&session) {
                    Ok(events) => {
                        for event in events {
                            println!("  {}  [{}] {}", event.date, event.kind, event.title);
                        }
                    }
                    Err(e) => report_error(&e),
                },
                Some("add") => {
                    let kind = match parts.next().map(TimelineKind::from_str) {
                        Some(Ok(kind)) => kind,
                        Some(Err(e)) => {
                            println!("Error: {e}");
                            continue;
                        }
                        None => {
                            println!("Usage: timeline add <exam|homework> [YYYY-MM-DD] <title...>");
                            continue;
                        }
                    };
                    let mut rest: Vec<&str> = parts.collect();
                    let has_date = rest
                        .first()
                        .is_some_and(|first| NaiveDate::parse_from_str(first, "%Y-%m-%d").is_ok());
                    let date = if has_date {
                        rest.remove(0).to_string()
                    } else {
                        chrono::Local::now().date_naive().to_string()
                    };
                    let title = rest.join(" ");
                    match dashboard.add_timeline_event(&mut session, kind, &date, &title) {
                        Ok(event) => {
                            println!("Added {} on {}: {}", event.kind, event.date, event.title)
                        }
                        Err(e) => println!("Error: {e}"),
                    }
                }
                _ => println!("Usage: timeline <add|list>"),
            },
            _ => println!("Unknown command. Type 'help'."),
        }
    }
}
