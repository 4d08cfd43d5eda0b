use std::io::{stdout, Stdout, Write};

use crossterm::{cursor, terminal, ExecutableCommand};

use crate::utilities::building_report::BuildingReport;

/// Redraws the status table in place after every tick.
pub struct Debug<W: Write> {
    out: W,
    printed_lines: u16,
}

impl Debug<Stdout> {
    pub fn new() -> Self {
        Debug::with_writer(stdout())
    }
}

impl Default for Debug<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Debug<W> {
    pub fn with_writer(out: W) -> Self {
        Debug {
            out,
            printed_lines: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn printstatus(&mut self, report: &BuildingReport) -> std::io::Result<()> {
        if self.printed_lines > 0 {
            self.out.execute(cursor::MoveUp(self.printed_lines))?;
            self.out
                .execute(terminal::Clear(terminal::ClearType::FromCursorDown))?;
        }
        let table = render_status(report);
        self.out.write_all(table.as_bytes())?;
        self.out.flush()?;
        self.printed_lines = table.lines().count() as u16;
        Ok(())
    }
}

fn format_requests(requests: &[shared_resources::Request]) -> String {
    if requests.is_empty() {
        return String::from("-");
    }
    requests
        .iter()
        .map(|request| format!("{}->{}", request.start_floor, request.end_floor))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn render_status(report: &BuildingReport) -> String {
    let mut table = String::new();
    let divider = "+------------+------------+------------+------------+------------+------------+\n";

    table.push_str(&format!("+{}+\n", "-".repeat(77)));
    table.push_str(&format!(
        "| {0:<10} | {1:<62} |\n",
        "SYSTEM",
        report.status.as_string()
    ));
    table.push_str(&format!(
        "| {0:<10} | {1:<62} |\n",
        "UP",
        format_requests(&report.up_requests)
    ));
    table.push_str(&format!(
        "| {0:<10} | {1:<62} |\n",
        "DOWN",
        format_requests(&report.down_requests)
    ));
    table.push_str(divider);
    table.push_str(&format!(
        "| {0:<10} | {1:<10} | {2:<10} | {3:<10} | {4:<10} | {5:<10} |\n",
        "ELEVATOR", "STATE", "FLOOR", "DIRECTION", "DOOR", "LOAD"
    ));
    for elevator in &report.elevators {
        table.push_str(divider);
        table.push_str(&format!(
            "| {0:<10} | {1:<10} | {2:<10} | {3:<10} | {4:<10} | {5:<10} |\n",
            elevator.id,
            elevator.behaviour.as_string(),
            elevator.floor,
            elevator.direction.as_string(),
            elevator.door.as_string(),
            format!("{}/{}", elevator.load.len(), report.capacity),
        ));
    }
    table.push_str(divider);
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::Building;
    use shared_resources::Request;

    #[test]
    fn test_render_lists_every_elevator() {
        let mut building = Building::new(6, 3, 4).unwrap();
        building.start().unwrap();
        building.add_request(Request::new(2, 5)).unwrap();

        let table = render_status(&building.report());
        assert!(table.contains("running"));
        assert!(table.contains("2->5"));
        assert_eq!(table.lines().filter(|line| line.contains("closed")).count(), 3);
    }

    #[test]
    fn test_printstatus_redraws_in_place() {
        let building = Building::new(4, 1, 1).unwrap();
        let mut debug = Debug::with_writer(Vec::new());
        debug.printstatus(&building.report()).unwrap();
        let first = debug.printed_lines;
        debug.printstatus(&building.report()).unwrap();
        assert_eq!(debug.printed_lines, first);

        let output = String::from_utf8(debug.into_inner()).unwrap();
        assert_eq!(output.matches("out of service").count(), 2);
    }
}
