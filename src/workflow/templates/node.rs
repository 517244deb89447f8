use super::{deploy, runner, workflow, CodeTarget, CodeWorkflowTemplate, WorkflowFamily, DEPLOY_STEP_NAME};
use crate::workflow::document::{Scalar, Step, Workflow};

pub struct NodeTemplate;

impl CodeWorkflowTemplate for NodeTemplate {
    fn family(&self) -> WorkflowFamily {
        WorkflowFamily::Node
    }

    fn build(&self, target: &CodeTarget<'_>) -> Workflow {
        let app = target.app;

        let steps = vec![
            Step::named("Set up Node.js version")
                .uses("actions/setup-node@v1")
                .with("node-version", Scalar::quoted(target.runtime_version)),
            Step::named("npm install, build, and test").run(Scalar::block([
                "npm install",
                "npm run build --if-present",
                "npm run test --if-present",
            ])),
            deploy(
                Step::named_quoted(DEPLOY_STEP_NAME),
                app.display_name(),
                app,
                target.publish_profile_secret,
            )
            .with("package", Scalar::plain(".")),
        ];

        workflow("Node.js", app, runner(target.is_linux), steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::templates::AppTarget;

    #[test]
    fn test_node_document() {
        let app = AppTarget::new("app1", Some("staging"), "main");
        let target = CodeTarget {
            app: &app,
            is_linux: true,
            runtime_version: "14.x",
            publish_profile_secret: "AzureAppService_PublishProfile_abc",
        };

        let expected = "# Docs for the Azure Web Apps Deploy action: https://github.com/Azure/webapps-deploy
# More GitHub Actions for Azure: https://github.com/Azure/actions

name: Build and deploy Node.js app to Azure Web App - app1(staging)

on:
  push:
    branches:
      - main

jobs:
  build-and-deploy:
    runs-on: ubuntu-latest

    steps:
    - uses: actions/checkout@master

    - name: Set up Node.js version
      uses: actions/setup-node@v1
      with:
        node-version: '14.x'

    - name: npm install, build, and test
      run: |
        npm install
        npm run build --if-present
        npm run test --if-present

    - name: 'Deploy to Azure Web App'
      uses: azure/webapps-deploy@v2
      with:
        app-name: 'app1(staging)'
        slot-name: 'staging'
        publish-profile: ${{ secrets.AzureAppService_PublishProfile_abc }}
        package: .";

        assert_eq!(NodeTemplate.build(&target).render(), expected);
    }

    #[test]
    fn test_node_windows_runner() {
        let app = AppTarget::new("app1", None, "master");
        let target = CodeTarget {
            app: &app,
            is_linux: false,
            runtime_version: "12.13.0",
            publish_profile_secret: "secret",
        };
        let rendered = NodeTemplate.build(&target).render();
        assert!(rendered.contains("    runs-on: windows-latest\n"));
        assert!(rendered.contains("        slot-name: 'production'\n"));
    }
}
