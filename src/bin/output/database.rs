use sqlite::{Connection, State, Statement};
use std::path::Path;

use mapper::graph::Graph;
use mapper::schedule::Policy;
use mapper::system::Outcome;

use Result;
use output::Output;

pub struct Database {
    connection: Connection,
}

impl Database {
    pub fn new<T: AsRef<Path>>(path: T) -> Result<Database> {
        use sql::prelude::*;

        let connection = ok!(Connection::open(path));

        ok!(connection.execute({
            ok!(create_table("runs").if_not_exists().columns(&[
                "iteration".integer().not_null(), "policy".string().not_null(),
                "tasks".integer().not_null(), "edges".integer().not_null(),
                "deadline".integer().not_null(), "makespan".integer().not_null(),
                "missed".integer().not_null(), "peak_cpu_queued".integer().not_null(),
                "peak_gpu_queued".integer().not_null(),
            ]).compile())
        }));
        ok!(connection.execute({
            ok!(create_table("schedules").if_not_exists().columns(&[
                "iteration".integer().not_null(), "policy".string().not_null(),
                "thread".integer().not_null(), "position".integer().not_null(),
                "task".integer().not_null(), "stage".string().not_null(),
                "start".integer().not_null(), "finish".integer().not_null(),
            ]).compile())
        }));
        ok!(connection.execute({
            ok!(create_table("allocations").if_not_exists().columns(&[
                "iteration".integer().not_null(), "policy".string().not_null(),
                "position".integer().not_null(), "task".integer().not_null(),
                "device".integer().not_null(),
            ]).compile())
        }));

        for table in &["runs", "schedules", "allocations"] {
            ok!(connection.execute(ok!(delete_from(*table).compile())));
        }

        Ok(Database { connection: connection })
    }

    fn write(&self, iteration: i64, policy: &str, graph: &Graph,
             outcome: &Outcome) -> Result<()> {
        use sql::prelude::*;

        let mut statement = ok!(self.connection.prepare({
            ok!(insert_into("runs").columns(&[
                "iteration", "policy", "tasks", "edges", "deadline", "makespan", "missed",
                "peak_cpu_queued", "peak_gpu_queued",
            ]).compile())
        }));
        ok!(statement.bind((1, iteration)));
        ok!(statement.bind((2, policy)));
        ok!(statement.bind((3, graph.len() as i64)));
        ok!(statement.bind((4, graph.edges() as i64)));
        ok!(statement.bind((5, graph.deadline as i64)));
        ok!(statement.bind((6, outcome.makespan as i64)));
        ok!(statement.bind((7, outcome.missed as i64)));
        ok!(statement.bind((8, outcome.history.peak_cpu_queued as i64)));
        ok!(statement.bind((9, outcome.history.peak_gpu_queued as i64)));
        execute(&mut statement)?;

        let mut statement = ok!(self.connection.prepare({
            ok!(insert_into("schedules").columns(&[
                "iteration", "policy", "thread", "position", "task", "stage", "start", "finish",
            ]).compile())
        }));
        for (thread, schedule) in outcome.schedules.iter().enumerate() {
            for (position, &(task, stage)) in schedule.iter().enumerate() {
                let span = some!(outcome.records[task].span(stage),
                                 "found no {} stage of task #{}", stage, task);
                let stage = stage.to_string();
                ok!(statement.reset());
                ok!(statement.bind((1, iteration)));
                ok!(statement.bind((2, policy)));
                ok!(statement.bind((3, thread as i64)));
                ok!(statement.bind((4, position as i64)));
                ok!(statement.bind((5, task as i64)));
                ok!(statement.bind((6, &stage[..])));
                ok!(statement.bind((7, span.start as i64)));
                ok!(statement.bind((8, span.finish as i64)));
                execute(&mut statement)?;
            }
        }

        let mut statement = ok!(self.connection.prepare({
            ok!(insert_into("allocations").columns(&[
                "iteration", "policy", "position", "task", "device",
            ]).compile())
        }));
        for (position, &(task, device)) in outcome.allocations.iter().enumerate() {
            ok!(statement.reset());
            ok!(statement.bind((1, iteration)));
            ok!(statement.bind((2, policy)));
            ok!(statement.bind((3, position as i64)));
            ok!(statement.bind((4, task as i64)));
            ok!(statement.bind((5, device as i64)));
            execute(&mut statement)?;
        }

        Ok(())
    }
}

impl Output for Database {
    fn next(&mut self, iteration: usize, policy: &Policy, graph: &Graph,
            outcome: &Outcome) -> Result<()> {
        ok!(self.connection.execute("BEGIN TRANSACTION"));
        let result = self.write(iteration as i64, &policy.to_string(), graph, outcome);
        ok!(self.connection.execute(if result.is_ok() { "COMMIT" } else { "ROLLBACK" }));
        result
    }
}

fn execute(statement: &mut Statement) -> Result<()> {
    if State::Done != ok!(statement.next()) {
        raise!("failed to write into the database");
    }
    Ok(())
}
