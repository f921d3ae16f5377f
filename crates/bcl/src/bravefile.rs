//! Bravefile: unit description bound by the `bcl` binary
//!
//! ```text
//! base { image alpine/edge; location public; }
//! packages { manager apk; system [bash, curl]; }
//! run { command echo; args [hello]; }
//! copy { source conf/; target /etc/app/; }
//! service {
//!     name web;
//!     ports [80:80, 443:443];
//!     resources { ram 1GB; cpu 2; }
//! }
//! ```
use serde::Serialize;

#[derive(Serialize, Default, Debug, Clone, PartialEq)]
pub struct Bravefile {
    pub base: ImageDescription,
    #[serde(rename = "packages")]
    pub system_packages: Packages,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub run: Vec<RunCommand>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub copy: Vec<CopyCommand>,
    #[serde(rename = "service")]
    pub platform_service: Service,
}

#[derive(Serialize, Default, Debug, Clone, PartialEq)]
pub struct ImageDescription {
    pub image: String,
    pub location: String,
}

/// System packages installed into the container
#[derive(Serialize, Default, Debug, Clone, PartialEq)]
pub struct Packages {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub manager: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub system: Vec<String>,
}

#[derive(Serialize, Default, Debug, Clone, PartialEq)]
pub struct RunCommand {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub command: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub content: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

#[derive(Serialize, Default, Debug, Clone, PartialEq)]
pub struct CopyCommand {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub source: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub target: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub action: String,
}

#[derive(Serialize, Default, Debug, Clone, PartialEq)]
pub struct Service {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub image: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub docker: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub ip: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<String>,
    pub resources: Resources,
    pub postdeploy: Postdeploy,
}

/// Operations performed once the service is deployed
#[derive(Serialize, Default, Debug, Clone, PartialEq)]
pub struct Postdeploy {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub run: Vec<RunCommand>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub copy: Vec<CopyCommand>,
}

#[derive(Serialize, Default, Debug, Clone, PartialEq)]
pub struct Resources {
    pub ram: String,
    pub cpu: i64,
    pub gpu: String,
}

crate::composite! {
    Bravefile { base, system_packages | packages, run, copy, platform_service | service }
    ImageDescription { image, location }
    Packages { manager, system }
    RunCommand { command, content, args }
    CopyCommand { source, target, action }
    Service { image, name, docker, version, ip, ports, resources, postdeploy }
    Postdeploy { run, copy }
    Resources { ram, cpu, gpu }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn aliases_and_rust_names() {
        let bravefile: Bravefile = crate::from_str(
            "packages { manager apk; }\nsystem_packages { system [git]; }\nservice { name web; }",
        )
        .unwrap();

        assert_eq!(bravefile.system_packages.manager, "apk");
        assert_eq!(bravefile.system_packages.system, ["git"]);
        assert_eq!(bravefile.platform_service.name, "web");
    }

    #[test]
    fn empty_fields_are_skipped() {
        let bravefile: Bravefile = crate::from_str("run { command ls; }").unwrap();
        let json = serde_json::to_value(&bravefile).unwrap();

        assert_eq!(json["run"], serde_json::json!([{ "command": "ls" }]));
        assert!(json.get("copy").is_none());
        assert_eq!(json["packages"], serde_json::json!({}));
        assert_eq!(
            json["service"]["resources"],
            serde_json::json!({ "ram": "", "cpu": 0, "gpu": "" })
        );
    }
}
