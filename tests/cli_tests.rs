#[cfg(test)]
mod cli_tests {
    use assert_cmd::Command;
    use rusqlite::Connection;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn producto_db() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tienda.db");
        Connection::open(&path)
            .unwrap()
            .execute_batch(
                "CREATE TABLE producto (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    nombre TEXT NOT NULL UNIQUE,
                    precio REAL NOT NULL,
                    descripcion TEXT
                );",
            )
            .unwrap();
        (dir, path)
    }

    fn crudaux(db: &PathBuf) -> Command {
        let mut cmd = Command::cargo_bin("crudaux").unwrap();
        cmd.arg("--db").arg(db);
        cmd
    }

    fn stdout_of(cmd: &mut Command) -> String {
        let output = cmd.output().unwrap();
        String::from_utf8(output.stdout).unwrap()
    }

    #[test]
    fn test_help() {
        let output = Command::cargo_bin("crudaux").unwrap().arg("help").output().unwrap();
        assert!(output.status.success());
        assert!(String::from_utf8_lossy(&output.stdout).contains("Usage: crudaux"));
    }

    #[test]
    fn test_insert_and_list() {
        let (_dir, db) = producto_db();

        let out = stdout_of(crudaux(&db).args([
            "insert",
            "producto",
            "nombre=Lapiz",
            "precio=5.50",
            "descripcion=Lapiz de madera",
        ]));
        let reply: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(reply["codigo"], 1);

        let out = stdout_of(crudaux(&db).args(["list", "producto", "--columns", "id,nombre"]));
        let rows: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(rows.as_array().unwrap().len(), 1);
        assert_eq!(rows[0]["nombre"], "Lapiz");
        assert_eq!(rows[0]["id"], "1");
    }

    #[test]
    fn test_delete_missing_row_exits_with_failure() {
        let (_dir, db) = producto_db();

        let output = crudaux(&db)
            .args(["delete", "producto", "--where", "id = ?", "--param", "999999"])
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(1));

        let reply: serde_json::Value =
            serde_json::from_str(String::from_utf8_lossy(&output.stdout).trim()).unwrap();
        assert_eq!(reply["codigo"], 0);
    }

    #[test]
    fn test_unknown_command_exits_with_usage() {
        let output = Command::cargo_bin("crudaux")
            .unwrap()
            .args(["truncate", "producto"])
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(2));
        assert!(String::from_utf8_lossy(&output.stderr).contains("unknown command: truncate"));
    }
}
