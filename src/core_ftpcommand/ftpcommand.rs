#[derive(Eq, Hash, PartialEq, Debug)]
pub enum FtpCommand {
    USER,
    PASS,
    QUIT,
    PWD,
    LIST,
    CWD,
    CDUP,
    NOOP,
    MKD,
    RMD,
    DELE,
    RNFR,
    RNTO,
    RETR,
    STOR,
    PORT,
    PASV,
    FEAT,
    ALLO,
    SYST,
    TYPE,
    SIZE,
    MDTM,
}

impl FtpCommand {
    pub fn from_str(cmd: &str) -> Option<FtpCommand> {
        match cmd.to_ascii_uppercase().as_str() {
            "USER" => Some(FtpCommand::USER),
            "PASS" => Some(FtpCommand::PASS),
            "QUIT" => Some(FtpCommand::QUIT),
            "PWD" => Some(FtpCommand::PWD),
            "LIST" => Some(FtpCommand::LIST),
            "CWD" => Some(FtpCommand::CWD),
            "CDUP" => Some(FtpCommand::CDUP),
            "NOOP" => Some(FtpCommand::NOOP),
            "MKD" => Some(FtpCommand::MKD),
            "RMD" => Some(FtpCommand::RMD),
            "DELE" => Some(FtpCommand::DELE),
            "RNFR" => Some(FtpCommand::RNFR),
            "RNTO" => Some(FtpCommand::RNTO),
            "RETR" => Some(FtpCommand::RETR),
            "STOR" => Some(FtpCommand::STOR),
            "PORT" => Some(FtpCommand::PORT),
            "PASV" => Some(FtpCommand::PASV),
            "FEAT" => Some(FtpCommand::FEAT),
            "ALLO" => Some(FtpCommand::ALLO),
            "SYST" => Some(FtpCommand::SYST),
            "TYPE" => Some(FtpCommand::TYPE),
            "SIZE" => Some(FtpCommand::SIZE),
            "MDTM" => Some(FtpCommand::MDTM),
            _ => None,
        }
    }

    /// Commands allowed before the session is authenticated and bound.
    pub fn requires_auth(&self) -> bool {
        !matches!(
            self,
            FtpCommand::USER
                | FtpCommand::PASS
                | FtpCommand::QUIT
                | FtpCommand::NOOP
                | FtpCommand::SYST
                | FtpCommand::FEAT
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbs_parse_case_insensitively() {
        assert_eq!(FtpCommand::from_str("stor"), Some(FtpCommand::STOR));
        assert_eq!(FtpCommand::from_str("List"), Some(FtpCommand::LIST));
        assert_eq!(FtpCommand::from_str("XYZZY"), None);
    }

    #[test]
    fn filesystem_verbs_require_authentication() {
        assert!(FtpCommand::LIST.requires_auth());
        assert!(FtpCommand::STOR.requires_auth());
        assert!(FtpCommand::CWD.requires_auth());
        assert!(!FtpCommand::USER.requires_auth());
        assert!(!FtpCommand::PASS.requires_auth());
        assert!(!FtpCommand::QUIT.requires_auth());
    }
}
