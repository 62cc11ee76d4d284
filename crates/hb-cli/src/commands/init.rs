//! Init command for preparing a fresh scoring database.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use hb_db::Database;

/// Runs the init command.
///
/// Opening the database already created the schema; this seeds the
/// activity types every view resolves by key.
pub fn run<W: Write>(writer: &mut W, db: &mut Database, database_path: &Path) -> Result<()> {
    let created = db.seed_time_types()?;
    tracing::debug!(created, "seeded activity types");

    writeln!(writer, "Database:  {}", database_path.display())?;
    if created == 0 {
        writeln!(writer, "Activities: already present")?;
    } else {
        writeln!(writer, "Activities: created {created}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    #[test]
    fn init_is_idempotent() {
        let mut db = Database::open_in_memory().unwrap();
        let path = Path::new("/tmp/hb.db");

        let mut first = Vec::new();
        run(&mut first, &mut db, path).unwrap();
        assert_snapshot!(String::from_utf8(first).unwrap(), @r"
        Database:  /tmp/hb.db
        Activities: created 3
        ");

        let mut second = Vec::new();
        run(&mut second, &mut db, path).unwrap();
        assert_snapshot!(String::from_utf8(second).unwrap(), @r"
        Database:  /tmp/hb.db
        Activities: already present
        ");
    }
}
