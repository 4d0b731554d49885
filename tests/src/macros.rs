/// Expands each listed function into one `#[test]` per enabled driver.
///
/// ```ignore
/// fn crud(test: &mut DbTest) { ... }
///
/// tests!(crud);
/// ```
#[macro_export]
macro_rules! tests {
    (
        $(
            $( #[$attrs:meta] )*
            $f:ident
        ),+ $(,)?
    ) => {
        #[cfg(feature = "sqlite")]
        mod sqlite {
            $(
                #[test]
                $( #[$attrs] )*
                fn $f() {
                    let mut test = $crate::DbTest::new(
                        $crate::db::sqlite::SetupSqlite::new()
                    );
                    super::$f(&mut test);
                }
            )*
        }

        #[cfg(feature = "mysql")]
        mod mysql {
            $(
                #[test]
                $( #[$attrs] )*
                fn $f() {
                    let mut test = $crate::DbTest::new(
                        $crate::db::mysql::SetupMySql::new()
                    );
                    super::$f(&mut test);
                }
            )*
        }
    };
}
