/// # Integration Tests Module
///
/// End-to-end scenarios against a real database file: every call below opens
/// and closes its own connection, exactly as callers use the library.

#[cfg(test)]
mod tests {
    use crate::core::db::{Columns, Condition, CrudAux, ZeroRowsPolicy, NO_PARAMS};
    use crate::core::FailureKind;
    use crate::reply::Reply;
    use crate::test_utils::ProductFixture;
    use crate::DatabaseConfig;

    /// Insert a product and read it back by its generated id
    #[test]
    fn test_insert_select_round_trip() {
        let fixture = ProductFixture::new().unwrap();
        let crud = fixture.crud();

        let id = crud
            .insert_row(
                "producto",
                &["nombre", "precio", "descripcion"],
                &["Lapiz", "5.50", "Lapiz de madera"],
            )
            .unwrap();
        assert!(id > 0);

        let row = crud
            .select_row("producto", &Columns::from("*"), Some(&"id = ?".into()), &[id])
            .unwrap()
            .unwrap();
        assert_eq!(row.get("nombre"), Some("Lapiz"));
        assert_eq!(row.get("descripcion"), Some("Lapiz de madera"));
        assert_eq!(row.get("id"), Some(id.to_string().as_str()));
    }

    /// Deleting a missing id reports failure and touches nothing
    #[test]
    fn test_delete_nonexistent_id_fails() {
        let fixture = ProductFixture::with_sample_data().unwrap();
        let result = fixture
            .crud()
            .delete_row("producto", Some(&Condition::raw("id = ?")), &[999999]);

        let err = result.unwrap_err();
        assert_eq!(err.kind(), FailureKind::ZeroEffect);
        assert_eq!(fixture.count("producto"), 3);
    }

    /// A blank condition is an error, never a table-wide delete
    #[test]
    fn test_blank_condition_deletes_nothing() {
        let fixture = ProductFixture::with_sample_data().unwrap();
        let err = fixture
            .crud()
            .delete_row("producto", Some(&Condition::raw("   ")), NO_PARAMS)
            .unwrap_err();

        assert_eq!(err.kind(), FailureKind::Statement);
        assert_eq!(fixture.count("producto"), 3);
    }

    /// Two-row batch update: precio then the condition value, once per row
    #[test]
    fn test_batch_update_binds_values_then_condition() {
        let fixture = ProductFixture::with_sample_data().unwrap();
        let crud = fixture.crud();

        let affected = crud
            .update_rows(
                "producto",
                &["precio"],
                &[vec!["10.00"], vec!["20.00"]],
                Some(&Condition::raw("nombre = ?")),
                &["Lapiz"],
            )
            .unwrap();
        assert_eq!(affected, 2);

        let others = crud
            .select_rows(
                "producto",
                &Columns::from("nombre,precio"),
                Some(&Condition::ne("nombre").unwrap()),
                &["Lapiz"],
            )
            .unwrap();
        assert_eq!(others.len(), 2);
        assert_eq!(others[0].get("precio"), Some("25"));
    }

    /// Row 3 of 5 violates NOT NULL: nothing from the batch survives
    #[test]
    fn test_batch_update_is_all_or_nothing() {
        let fixture = ProductFixture::with_sample_data().unwrap();
        let crud = fixture.crud();

        let before = crud
            .select_rows("producto", &Columns::All, None, NO_PARAMS)
            .unwrap();

        let rows = vec![
            vec![Some("1.00"), Some("uno")],
            vec![Some("2.00"), Some("dos")],
            vec![None, Some("tres")],
            vec![Some("4.00"), Some("cuatro")],
            vec![Some("5.00"), Some("cinco")],
        ];
        let err = crud
            .update_rows(
                "producto",
                &["precio", "descripcion"],
                rows.as_slice(),
                Some(&Condition::in_list("id", 2).unwrap()),
                &[1, 2],
            )
            .unwrap_err();
        assert_eq!(err.kind(), FailureKind::Statement);

        let after = crud
            .select_rows("producto", &Columns::All, None, NO_PARAMS)
            .unwrap();
        assert_eq!(before, after);
    }

    /// "No rows" and "could not run" never look the same
    #[test]
    fn test_empty_result_differs_from_connection_failure() {
        let fixture = ProductFixture::new().unwrap();
        let empty = fixture
            .crud()
            .select_rows("producto", &Columns::All, None, NO_PARAMS);
        assert!(matches!(empty, Ok(ref rows) if rows.is_empty()));

        let offline = CrudAux::new(DatabaseConfig::new("/nonexistent/path/tienda.db"));
        let failed = offline.select_rows("producto", &Columns::All, None, NO_PARAMS);
        assert_eq!(failed.unwrap_err().kind(), FailureKind::Connection);

        let failed = offline.insert_row("producto", &["nombre", "precio"], &["Lapiz", "1"]);
        assert_eq!(failed.unwrap_err().kind(), FailureKind::Connection);
    }

    /// A zero-row delete can be made a success explicitly
    #[test]
    fn test_lenient_delete_policy_commits() {
        let fixture = ProductFixture::with_sample_data().unwrap();
        let crud = fixture.crud().with_delete_policy(ZeroRowsPolicy::Succeed);

        let deleted = crud
            .delete_row("producto", Some(&Condition::eq("nombre").unwrap()), &["Nada"])
            .unwrap();
        assert_eq!(deleted, 0);

        let deleted = crud
            .delete_row("producto", Some(&Condition::lt("precio").unwrap()), &[10])
            .unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(fixture.count("producto"), 1);
    }

    /// Outcomes convert to the reply the form pages expect
    #[test]
    fn test_outcomes_as_replies() {
        let fixture = ProductFixture::new().unwrap();
        let crud = fixture.crud();

        let inserted = crud.insert_row("producto", &["nombre", "precio"], &["Goma", "3"]);
        let reply = Reply::from_result(&inserted, |id| format!("Producto {} agregado", id));
        assert!(reply.is_success());

        let duplicate = crud.insert_row("producto", &["nombre", "precio"], &["Goma", "3"]);
        let reply = Reply::from_result(&duplicate, |id| format!("Producto {} agregado", id));
        assert!(!reply.is_success());
        assert!(reply.texto.contains("UNIQUE"));
        assert_eq!(fixture.count("producto"), 1);
    }
}
