//! Shared `BaseRepository` class every generated repository derives from

/// Generate `BaseRepository.cs`.
///
/// `OpenConnection` reads the named connection string from the application
/// configuration; `SetIdentity` fetches `@@IDENTITY` on an open connection.
pub fn generate_base_repository(namespace: &str, connection_string_name: &str) -> String {
    let connection_string_name = connection_string_name
        .replace('\\', "\\\\")
        .replace('"', "\\\"");

    let mut code = String::new();
    code.push_str(
        r#"using System;
using System.Configuration;
using System.Data;
using System.Data.SqlClient;
using System.Linq;
using Dapper;

"#,
    );
    code.push_str(&format!("namespace {}\n{{\n", namespace));
    code.push_str(
        r#"    public abstract class BaseRepository
    {
        protected static void SetIdentity<T>(IDbConnection connection, Action<T> setId)
        {
            dynamic identity = connection.Query("SELECT @@IDENTITY AS Id").Single();
            T newId = (T)identity.Id;
            setId(newId);
        }

        protected static IDbConnection OpenConnection()
        {
"#,
    );
    code.push_str(&format!(
        "            IDbConnection connection = new SqlConnection(ConfigurationManager.ConnectionStrings[\"{}\"].ConnectionString);\n",
        connection_string_name
    ));
    code.push_str(
        r#"            connection.Open();
            return connection;
        }
    }
}
"#,
    );
    code
}
