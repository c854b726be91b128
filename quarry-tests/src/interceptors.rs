use crate::read_all;
use quarry::{Connection, Database, Operation, Outcome, Query};
use std::{cell::RefCell, rc::Rc};

pub fn interceptors<C: Connection>(connection: C) {
    let trace = Rc::new(RefCell::new(Vec::<String>::new()));
    let observed = trace.clone();
    let mut database = Database::new(connection)
        .intercept(move |operation, query, next| {
            observed
                .borrow_mut()
                .push(format!("{} {}", operation, query.source));
            let result = next(query);
            observed.borrow_mut().push(match &result {
                Ok(Outcome::Cursor(..)) => "cursor".into(),
                Ok(Outcome::Success(v)) => format!("success {}", v),
                Err(..) => "error".into(),
            });
            result
        })
        .intercept(|operation, query, next| {
            // Deletes are never let through
            if operation == Operation::Delete {
                return Ok(Outcome::Success(false));
            }
            // Reads are capped to a single row
            if operation == Operation::Read && query.limit.is_none() {
                return next(&query.clone().limit(1));
            }
            next(query)
        });

    assert!(
        !database
            .delete(&Query::delete("quarry_companies"))
            .expect("Failed to run the vetoed delete")
    );
    let rows = read_all(&mut database, &Query::read("quarry_companies").order("id"));
    assert_eq!(rows.len(), 1);
    let rows = read_all(
        &mut database,
        &Query::read("quarry_companies").order("id").limit(5),
    );
    assert_eq!(rows.len(), 2);
    assert_eq!(
        *trace.borrow(),
        [
            "delete quarry_companies",
            "success false",
            "read quarry_companies",
            "cursor",
            "read quarry_companies",
            "cursor",
        ]
    );
}
