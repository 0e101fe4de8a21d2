// src/scaffold/templates.rs
//
// Tokens: __projectName__, __pascalName__, __framework__, __chartName__.

pub const CONSOLE_CSPROJ: &str = r#"<Project Sdk="Microsoft.NET.Sdk">

  <PropertyGroup>
    <OutputType>Exe</OutputType>
    <TargetFramework>__framework__</TargetFramework>
    <RootNamespace>__pascalName__</RootNamespace>
    <ImplicitUsings>enable</ImplicitUsings>
    <Nullable>enable</Nullable>
    <Version>0.1.0</Version>
  </PropertyGroup>

</Project>
"#;

pub const CLASSLIB_CSPROJ: &str = r#"<Project Sdk="Microsoft.NET.Sdk">

  <PropertyGroup>
    <TargetFramework>__framework__</TargetFramework>
    <RootNamespace>__pascalName__</RootNamespace>
    <ImplicitUsings>enable</ImplicitUsings>
    <Nullable>enable</Nullable>
    <Version>0.1.0</Version>
  </PropertyGroup>

</Project>
"#;

pub const WEBAPI_CSPROJ: &str = r#"<Project Sdk="Microsoft.NET.Sdk.Web">

  <PropertyGroup>
    <TargetFramework>__framework__</TargetFramework>
    <RootNamespace>__pascalName__</RootNamespace>
    <ImplicitUsings>enable</ImplicitUsings>
    <Nullable>enable</Nullable>
    <Version>0.1.0</Version>
  </PropertyGroup>

</Project>
"#;

pub const CONSOLE_PROGRAM: &str = r#"namespace __pascalName__;

internal static class Program
{
    private static void Main(string[] args)
    {
        Console.WriteLine("Hello from __projectName__!");
    }
}
"#;

pub const CLASSLIB_CLASS: &str = r#"namespace __pascalName__;

public class Class1
{
}
"#;

pub const WEBAPI_PROGRAM: &str = r#"var builder = WebApplication.CreateBuilder(args);

var app = builder.Build();

app.MapGet("/", () => "Hello from __projectName__!");
app.MapGet("/health", () => Results.Ok());

app.Run();
"#;

pub const WEBAPI_APPSETTINGS: &str = r#"{
  "Logging": {
    "LogLevel": {
      "Default": "Information",
      "Microsoft.AspNetCore": "Warning"
    }
  },
  "AllowedHosts": "*"
}
"#;

pub const XUNIT_CSPROJ: &str = r#"<Project Sdk="Microsoft.NET.Sdk">

  <PropertyGroup>
    <TargetFramework>__framework__</TargetFramework>
    <RootNamespace>__pascalName__.Tests</RootNamespace>
    <ImplicitUsings>enable</ImplicitUsings>
    <Nullable>enable</Nullable>
    <IsPackable>false</IsPackable>
    <IsTestProject>true</IsTestProject>
  </PropertyGroup>

  <ItemGroup>
    <PackageReference Include="Microsoft.NET.Test.Sdk" Version="17.8.0" />
    <PackageReference Include="xunit" Version="2.6.2" />
    <PackageReference Include="xunit.runner.visualstudio" Version="2.5.4" />
    <PackageReference Include="coverlet.collector" Version="6.0.0" />
  </ItemGroup>

</Project>
"#;

pub const NUNIT_CSPROJ: &str = r#"<Project Sdk="Microsoft.NET.Sdk">

  <PropertyGroup>
    <TargetFramework>__framework__</TargetFramework>
    <RootNamespace>__pascalName__.Tests</RootNamespace>
    <ImplicitUsings>enable</ImplicitUsings>
    <Nullable>enable</Nullable>
    <IsPackable>false</IsPackable>
    <IsTestProject>true</IsTestProject>
  </PropertyGroup>

  <ItemGroup>
    <PackageReference Include="Microsoft.NET.Test.Sdk" Version="17.8.0" />
    <PackageReference Include="NUnit" Version="3.14.0" />
    <PackageReference Include="NUnit3TestAdapter" Version="4.5.0" />
    <PackageReference Include="coverlet.collector" Version="6.0.0" />
  </ItemGroup>

</Project>
"#;

pub const MSTEST_CSPROJ: &str = r#"<Project Sdk="Microsoft.NET.Sdk">

  <PropertyGroup>
    <TargetFramework>__framework__</TargetFramework>
    <RootNamespace>__pascalName__.Tests</RootNamespace>
    <ImplicitUsings>enable</ImplicitUsings>
    <Nullable>enable</Nullable>
    <IsPackable>false</IsPackable>
    <IsTestProject>true</IsTestProject>
  </PropertyGroup>

  <ItemGroup>
    <PackageReference Include="Microsoft.NET.Test.Sdk" Version="17.8.0" />
    <PackageReference Include="MSTest.TestAdapter" Version="3.1.1" />
    <PackageReference Include="MSTest.TestFramework" Version="3.1.1" />
    <PackageReference Include="coverlet.collector" Version="6.0.0" />
  </ItemGroup>

</Project>
"#;

pub const XUNIT_TEST: &str = r#"namespace __pascalName__.Tests;

public class UnitTest1
{
    [Fact]
    public void Test1()
    {
    }
}
"#;

pub const NUNIT_TEST: &str = r#"namespace __pascalName__.Tests;

public class Tests
{
    [Test]
    public void Test1()
    {
        Assert.Pass();
    }
}
"#;

pub const MSTEST_TEST: &str = r#"namespace __pascalName__.Tests;

[TestClass]
public class UnitTest1
{
    [TestMethod]
    public void TestMethod1()
    {
    }
}
"#;

/// Multi-stage image for a .NET project. The build context is the project root.
pub const DOTNET_DOCKERFILE: &str = r#"FROM mcr.microsoft.com/dotnet/sdk:8.0 AS build
WORKDIR /src
COPY . .
RUN dotnet publish "__pascalName__.csproj" -c Release -o /app/publish

FROM mcr.microsoft.com/dotnet/aspnet:8.0 AS final
WORKDIR /app
COPY --from=build /app/publish .
ENTRYPOINT ["dotnet", "__pascalName__.dll"]
"#;

pub const GENERIC_DOCKERFILE: &str = r#"FROM alpine:3.19
WORKDIR /app
COPY . .
CMD ["echo", "__projectName__"]
"#;

pub const DOCKERIGNORE: &str = r#"bin/
obj/
test/
helm/
project.json
"#;

pub const HELM_CHART: &str = r#"apiVersion: v2
name: __chartName__
description: A Helm chart for __projectName__
type: application
version: 0.1.0
appVersion: "0.1.0"
"#;

pub const HELM_VALUES: &str = r#"replicaCount: 1

image:
  repository: __projectName__
  pullPolicy: IfNotPresent
  tag: latest

service:
  type: ClusterIP
  port: 80
"#;

pub const HELM_DEPLOYMENT: &str = r#"apiVersion: apps/v1
kind: Deployment
metadata:
  name: {{ .Release.Name }}
  labels:
    app.kubernetes.io/name: __chartName__
spec:
  replicas: {{ .Values.replicaCount }}
  selector:
    matchLabels:
      app.kubernetes.io/name: __chartName__
  template:
    metadata:
      labels:
        app.kubernetes.io/name: __chartName__
    spec:
      containers:
        - name: __chartName__
          image: "{{ .Values.image.repository }}:{{ .Values.image.tag }}"
          imagePullPolicy: {{ .Values.image.pullPolicy }}
          ports:
            - containerPort: 8080
"#;

pub const HELM_SERVICE: &str = r#"apiVersion: v1
kind: Service
metadata:
  name: {{ .Release.Name }}
spec:
  type: {{ .Values.service.type }}
  ports:
    - port: {{ .Values.service.port }}
      targetPort: 8080
  selector:
    app.kubernetes.io/name: __chartName__
"#;

pub const HELMIGNORE: &str = r#".DS_Store
.git/
*.tmp
"#;

/// Values overrides for a chart pulled from a remote repository.
pub const HELM_REPO_VALUES: &str = r#"# Overrides for __chartName__, installed for __projectName__.
image:
  repository: __projectName__
  tag: latest
"#;
