use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Caller roles as issued by the authentication collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rol {
    Administracion,
    Manager,
    Tecnico,
    Cliente,
}

impl FromStr for Rol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Administracion" => Ok(Rol::Administracion),
            "Manager" => Ok(Rol::Manager),
            "Tecnico" => Ok(Rol::Tecnico),
            "Cliente" => Ok(Rol::Cliente),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

impl fmt::Display for Rol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Rol::Administracion => "Administracion",
            Rol::Manager => "Manager",
            Rol::Tecnico => "Tecnico",
            Rol::Cliente => "Cliente",
        };
        f.write_str(s)
    }
}

/// Identity context extracted once per request and passed explicitly into
/// every service operation.
#[derive(Debug, Clone)]
pub struct Caller {
    pub username: String,
    pub rol: Rol,
    /// DNI claim, parsed softly: absent or non-numeric claims become `None`,
    /// meaning the caller is not resolvable to a Cliente row.
    pub dni: Option<i32>,
}

impl Caller {
    pub fn from_claims(username: &str, rol: Rol, dni_claim: Option<&str>) -> Self {
        let dni = dni_claim.and_then(|s| s.trim().parse::<i32>().ok());
        Self { username: username.to_string(), rol, dni }
    }
}

/// The record set a caller may see when listing clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientScope {
    /// Staff roles see every Cliente.
    All,
    /// A Cliente sees exactly the row matching their own DNI.
    Own(i32),
    /// Role Cliente with a missing or unparsable DNI claim.
    Unresolvable,
}

impl Rol {
    /// Capability lookup: maps role plus identifying claim to a query scope,
    /// evaluated once per request instead of per controller.
    pub fn client_scope(self, dni: Option<i32>) -> ClientScope {
        match self {
            Rol::Administracion | Rol::Manager | Rol::Tecnico => ClientScope::All,
            Rol::Cliente => dni.map_or(ClientScope::Unresolvable, ClientScope::Own),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_exact_names() {
        assert_eq!("Administracion".parse::<Rol>().unwrap(), Rol::Administracion);
        assert_eq!("Cliente".parse::<Rol>().unwrap(), Rol::Cliente);
        assert!("Superadmin".parse::<Rol>().is_err());
    }

    #[test]
    fn dni_claim_parses_softly() {
        let c = Caller::from_claims("ana", Rol::Cliente, Some("30111222"));
        assert_eq!(c.dni, Some(30111222));
        let c = Caller::from_claims("ana", Rol::Cliente, Some("not-a-number"));
        assert_eq!(c.dni, None);
        let c = Caller::from_claims("ana", Rol::Cliente, None);
        assert_eq!(c.dni, None);
    }

    #[test]
    fn staff_roles_scope_to_all_regardless_of_claim() {
        assert_eq!(Rol::Administracion.client_scope(None), ClientScope::All);
        assert_eq!(Rol::Manager.client_scope(Some(1)), ClientScope::All);
        assert_eq!(Rol::Tecnico.client_scope(None), ClientScope::All);
    }

    #[test]
    fn cliente_scope_follows_dni_claim() {
        assert_eq!(Rol::Cliente.client_scope(Some(7)), ClientScope::Own(7));
        assert_eq!(Rol::Cliente.client_scope(None), ClientScope::Unresolvable);
    }
}
