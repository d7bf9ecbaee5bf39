use std::io::Write;

use stowage_core::{
    digest::ContentId,
    error::ErrorContext,
    reference::Reference,
    store::BundleStore,
    StowageResult,
};
use tracing::debug;

use crate::{BundleRow, ListOptions};

const NONE: &str = "<none>";

/// Projects every stored entry into a display row, in store order.
///
/// The first failing read aborts the whole projection.
pub fn list_bundles(store: &dyn BundleStore) -> StowageResult<Vec<BundleRow>> {
    let references = store.list()?;
    debug!(count = references.len(), "listing bundles");

    references
        .into_iter()
        .map(|reference| {
            let bundle = store.read(&reference)?;
            let id = ContentId::of(&reference, &bundle)?;
            Ok(project_row(&reference, id, bundle.name))
        })
        .collect()
}

fn project_row(reference: &Reference, id: ContentId, name: String) -> BundleRow {
    let (tag, digest) = match reference {
        Reference::Tagged(tagged) => (Some(tagged.tag().to_string()), None),
        Reference::Digested(digested) => (None, Some(*digested.digest())),
    };

    BundleRow {
        repository: reference.repository(),
        tag,
        digest,
        id,
        name,
    }
}

/// Writes the listing of `store` to `out`.
///
/// Nothing is written unless every entry could be read.
pub fn write_bundle_list<W: Write>(
    store: &dyn BundleStore,
    options: &ListOptions,
    out: &mut W,
) -> StowageResult<()> {
    let rows = list_bundles(store)?;
    render_bundle_list(&rows, options, out).with_context(|| "writing bundle list".to_string())
}

/// Renders `rows` as a table, or as bare IDs when `options.quiet` is set.
pub fn render_bundle_list<W: Write>(
    rows: &[BundleRow],
    options: &ListOptions,
    out: &mut W,
) -> std::io::Result<()> {
    if options.quiet {
        for row in rows {
            writeln!(out, "{}", row.id)?;
        }
        return Ok(());
    }

    let mut header = vec!["REPOSITORY", "TAG"];
    if options.digests {
        header.push("DIGEST");
    }
    header.extend(["APP IMAGE ID", "APP NAME"]);

    let mut table: Vec<Vec<String>> = Vec::with_capacity(rows.len() + 1);
    table.push(header.into_iter().map(String::from).collect());

    for row in rows {
        let mut cells = vec![
            row.repository.clone(),
            row.tag.clone().unwrap_or_else(|| NONE.to_string()),
        ];
        if options.digests {
            cells.push(
                row.digest
                    .map_or_else(|| NONE.to_string(), |digest| digest.to_string()),
            );
        }
        cells.push(row.id.to_string());
        cells.push(row.name.clone());
        table.push(cells);
    }

    write_columns(&table, out)
}

/// Pads every column but the last to its widest cell, separated by one space.
fn write_columns<W: Write>(table: &[Vec<String>], out: &mut W) -> std::io::Result<()> {
    let columns = table.first().map_or(0, Vec::len);
    let widths: Vec<usize> = (0..columns)
        .map(|column| {
            table
                .iter()
                .map(|cells| cells[column].chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut buffer = String::new();
    for cells in table {
        for (column, cell) in cells.iter().enumerate() {
            buffer.push_str(cell);
            if column + 1 < cells.len() {
                let padding = widths[column] - cell.chars().count();
                buffer.extend(std::iter::repeat(' ').take(padding + 1));
            }
        }
        buffer.push('\n');
    }

    out.write_all(buffer.as_bytes())
}

#[cfg(test)]
mod tests {
    use stowage_core::{
        bundle::Bundle,
        error::{StoreError, StoreResult, StowageError},
        reference::DigestedReference,
        store::MemoryBundleStore,
    };

    use super::*;

    const DEFAULT_OUTPUT: &str = "\
REPOSITORY                                                       TAG    APP IMAGE ID APP NAME
foo/bar                                                          <none> 3f825b2d0657 Digested App
foo/bar                                                          1.0    9aae408ee04f Foo App
a855ac937f2ed375ba4396bbc49c4093e124da933acd2713fb9bc17d7562a087 <none> a855ac937f2e Quiet App
";

    const DIGESTS_OUTPUT: &str = "\
REPOSITORY                                                       TAG    DIGEST                                                                  APP IMAGE ID APP NAME
foo/bar                                                          <none> sha256:b59492bb814012ca3d2ce0b6728242d96b4af41687cc82166a4b5d7f2d9fb865 3f825b2d0657 Digested App
foo/bar                                                          1.0    <none>                                                                  9aae408ee04f Foo App
a855ac937f2ed375ba4396bbc49c4093e124da933acd2713fb9bc17d7562a087 <none> sha256:a855ac937f2ed375ba4396bbc49c4093e124da933acd2713fb9bc17d7562a087 a855ac937f2e Quiet App
";

    fn fixture_store() -> MemoryBundleStore {
        let store = MemoryBundleStore::new();
        let entries = [
            (
                "foo/bar@sha256:b59492bb814012ca3d2ce0b6728242d96b4af41687cc82166a4b5d7f2d9fb865",
                Bundle::new("Digested App"),
            ),
            (
                "foo/bar:1.0",
                Bundle::new("Foo App")
                    .with_version("1.0.0")
                    .with_schema_version("1.0.0"),
            ),
            (
                "a855ac937f2ed375ba4396bbc49c4093e124da933acd2713fb9bc17d7562a087",
                Bundle::new("Quiet App"),
            ),
        ];
        for (reference, bundle) in entries {
            let reference: Reference = reference.parse().unwrap();
            store.store(&reference, &bundle).unwrap();
        }
        store
    }

    fn render(store: &dyn BundleStore, options: ListOptions) -> String {
        let mut out = Vec::new();
        write_bundle_list(store, &options, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_list_default_table() {
        assert_eq!(
            render(&fixture_store(), ListOptions::default()),
            DEFAULT_OUTPUT
        );
    }

    #[test]
    fn test_list_with_digests() {
        let options = ListOptions {
            digests: true,
            ..Default::default()
        };
        assert_eq!(render(&fixture_store(), options), DIGESTS_OUTPUT);
    }

    #[test]
    fn test_list_quiet() {
        let options = ListOptions {
            quiet: true,
            ..Default::default()
        };
        assert_eq!(
            render(&fixture_store(), options),
            "3f825b2d0657\n9aae408ee04f\na855ac937f2e\n"
        );
    }

    #[test]
    fn test_list_empty_store_prints_header() {
        assert_eq!(
            render(&MemoryBundleStore::new(), ListOptions::default()),
            "REPOSITORY TAG APP IMAGE ID APP NAME\n"
        );
        let quiet = ListOptions {
            quiet: true,
            ..Default::default()
        };
        assert_eq!(render(&MemoryBundleStore::new(), quiet), "");
    }

    #[test]
    fn test_rows_follow_store_order() {
        let rows = list_bundles(&fixture_store()).unwrap();
        let names: Vec<&str> = rows.iter().map(|row| row.name.as_str()).collect();
        assert_eq!(names, ["Digested App", "Foo App", "Quiet App"]);
        assert_eq!(rows[1].tag.as_deref(), Some("1.0"));
        assert!(rows[1].digest.is_none());
    }

    #[test]
    fn test_wide_names_pad_by_characters() {
        let rows = vec![BundleRow {
            repository: "app".to_string(),
            tag: Some("1".to_string()),
            digest: None,
            id: ContentId::of(&"app:1".parse().unwrap(), &Bundle::new("Ünïcode")).unwrap(),
            name: "Ünïcode".to_string(),
        }];
        let mut out = Vec::new();
        render_bundle_list(&rows, &ListOptions::default(), &mut out).unwrap();
        let output = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[0].starts_with("REPOSITORY TAG APP IMAGE ID APP NAME"));
        assert!(lines[1].starts_with("app        1   "));
        assert!(lines[1].ends_with(" Ünïcode"));
    }

    /// Lists one reference that can never be read.
    struct UnreadableStore {
        inner: MemoryBundleStore,
        broken: Reference,
    }

    impl BundleStore for UnreadableStore {
        fn store(
            &self,
            reference: &Reference,
            bundle: &Bundle,
        ) -> StoreResult<DigestedReference> {
            self.inner.store(reference, bundle)
        }

        fn read(&self, reference: &Reference) -> StoreResult<Bundle> {
            self.inner.read(reference)
        }

        fn list(&self) -> StoreResult<Vec<Reference>> {
            let mut references = self.inner.list()?;
            references.push(self.broken.clone());
            Ok(references)
        }

        fn remove(&self, reference: &Reference) -> StoreResult<()> {
            self.inner.remove(reference)
        }

        fn look_up(&self, ref_or_id: &str) -> StoreResult<Reference> {
            self.inner.look_up(ref_or_id)
        }
    }

    #[test]
    fn test_read_failure_writes_nothing() {
        let store = UnreadableStore {
            inner: fixture_store(),
            broken: "ghost:1".parse().unwrap(),
        };

        let mut out = Vec::new();
        let error = write_bundle_list(&store, &ListOptions::default(), &mut out).unwrap_err();
        assert!(out.is_empty());
        assert!(matches!(
            error,
            StowageError::Store(StoreError::NotFound(ref reference)) if reference == "ghost:1"
        ));
        assert_eq!(error.to_string(), "Bundle not found: ghost:1");
    }
}
